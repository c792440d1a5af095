use std::sync::Arc;

use rpcstub_service::{Dispatcher, ServiceError};
use rpcstub_transport::CallContext;

use crate::types::{
    Read, ReadArgs, ReadRegB, ReadRegBArgs, ReadRegBResult, ReadRegW, ReadRegWArgs, ReadRegWResult,
    ReadResult, Scan, Write, WriteArgs, WriteRegB, WriteRegBArgs,
};

/// Server-side implementation of the I2C service.
///
/// Arguments reaching these methods already passed validation. Results are
/// validated after return; an invalid result is withheld from the caller but
/// whatever the method did to the bus stays done.
pub trait I2c: Send + Sync + 'static {
    fn read(&self, ctx: &CallContext, args: ReadArgs) -> Result<ReadResult, ServiceError>;

    fn read_reg_b(
        &self,
        ctx: &CallContext,
        args: ReadRegBArgs,
    ) -> Result<ReadRegBResult, ServiceError>;

    fn read_reg_w(
        &self,
        ctx: &CallContext,
        args: ReadRegWArgs,
    ) -> Result<ReadRegWResult, ServiceError>;

    fn scan(&self, ctx: &CallContext) -> Result<Vec<i64>, ServiceError>;

    fn write(&self, ctx: &CallContext, args: WriteArgs) -> Result<(), ServiceError>;

    fn write_reg_b(&self, ctx: &CallContext, args: WriteRegBArgs) -> Result<(), ServiceError>;
}

/// Register every I2C method of `service` on `dispatcher`.
pub fn register<S: I2c>(dispatcher: &mut Dispatcher, service: Arc<S>) -> rpcstub_service::Result<()> {
    let read = Arc::clone(&service);
    let read_reg_b = Arc::clone(&service);
    let read_reg_w = Arc::clone(&service);
    let scan = Arc::clone(&service);
    let write = Arc::clone(&service);
    let write_reg_b = service;

    dispatcher
        .register::<Read, _>(move |ctx, args| read.read(ctx, args))?
        .register::<ReadRegB, _>(move |ctx, args| read_reg_b.read_reg_b(ctx, args))?
        .register::<ReadRegW, _>(move |ctx, args| read_reg_w.read_reg_w(ctx, args))?
        .register::<Scan, _>(move |ctx, ()| scan.scan(ctx))?
        .register::<Write, _>(move |ctx, args| write.write(ctx, args))?
        .register::<WriteRegB, _>(move |ctx, args| write_reg_b.write_reg_b(ctx, args))?;
    Ok(())
}

/// A dispatcher serving `service`, backed by the shared I2C validators.
pub fn dispatcher<S: I2c>(service: Arc<S>) -> rpcstub_service::Result<Dispatcher> {
    let mut dispatcher = Dispatcher::new(crate::validators());
    register(&mut dispatcher, service)?;
    tracing::debug!(service = crate::SERVICE_ID, "I2C dispatcher ready");
    Ok(dispatcher)
}
