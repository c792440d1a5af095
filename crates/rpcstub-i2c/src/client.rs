use rpcstub_service::{Client, Result};
use rpcstub_transport::{CallContext, Transport};

use crate::types::{
    Read, ReadArgs, ReadRegB, ReadRegBArgs, ReadRegBResult, ReadRegW, ReadRegWArgs, ReadRegWResult,
    ReadResult, Scan, Write, WriteArgs, WriteRegB, WriteRegBArgs,
};

/// Typed client for one I2C service instance.
pub struct I2cClient<T> {
    inner: Client<T>,
}

impl<T: Transport> I2cClient<T> {
    pub fn new(transport: T, destination: impl Into<String>) -> Self {
        Self {
            inner: Client::new(transport, destination, crate::validators()),
        }
    }

    pub fn read(&self, ctx: &CallContext, args: &ReadArgs) -> Result<ReadResult> {
        self.inner.call::<Read>(ctx, args)
    }

    pub fn read_reg_b(&self, ctx: &CallContext, args: &ReadRegBArgs) -> Result<ReadRegBResult> {
        self.inner.call::<ReadRegB>(ctx, args)
    }

    pub fn read_reg_w(&self, ctx: &CallContext, args: &ReadRegWArgs) -> Result<ReadRegWResult> {
        self.inner.call::<ReadRegW>(ctx, args)
    }

    /// Addresses of the devices that acknowledged.
    pub fn scan(&self, ctx: &CallContext) -> Result<Vec<i64>> {
        self.inner.call::<Scan>(ctx, &())
    }

    pub fn write(&self, ctx: &CallContext, args: &WriteArgs) -> Result<()> {
        self.inner.call::<Write>(ctx, args)
    }

    pub fn write_reg_b(&self, ctx: &CallContext, args: &WriteRegBArgs) -> Result<()> {
        self.inner.call::<WriteRegB>(ctx, args)
    }

    /// The untyped client underneath.
    pub fn inner(&self) -> &Client<T> {
        &self.inner
    }
}
