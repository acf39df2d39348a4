//! Linux I2C adapter access via /dev/i2c-N.
//!
//! Issues the combined write-then-read exchange as a single I2C_RDWR
//! ioctl carrying two messages, so the bus sees one transaction with a
//! repeated start between the phases. The ioctl blocks for the duration
//! of the bus traffic and therefore runs on the blocking thread pool.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use nix::libc;

use crate::error::{Error, Result};
use crate::tracing::prelude::*;

use super::I2cBus;

/// I2C_RDWR ioctl request (linux/i2c-dev.h).
const I2C_RDWR: libc::c_ulong = 0x0707;

/// Message flag: this message is a read (linux/i2c.h).
const I2C_M_RD: u16 = 0x0001;

/// struct i2c_msg from linux/i2c.h.
#[repr(C)]
struct I2cMsg {
    addr: u16,
    flags: u16,
    len: u16,
    buf: *mut u8,
}

/// struct i2c_rdwr_ioctl_data from linux/i2c-dev.h.
#[repr(C)]
struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg,
    nmsgs: u32,
}

nix::ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, I2cRdwrIoctlData);

/// Bus executor backed by a Linux I2C character device.
pub struct LinuxI2c {
    file: Arc<File>,
}

impl LinuxI2c {
    /// Open an I2C adapter, e.g. `/dev/i2c-0`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                Error::Init(format!("cannot open I2C adapter {}: {}", path.display(), e))
            })?;
        Ok(Self {
            file: Arc::new(file),
        })
    }
}

#[async_trait]
impl I2cBus for LinuxI2c {
    async fn transact(&mut self, addr: u16, write: &[u8], read_len: usize) -> Result<Vec<u8>> {
        let file = Arc::clone(&self.file);
        let write = write.to_vec();

        let rx = tokio::task::spawn_blocking(move || {
            let mut tx = write;
            let mut rx = vec![0u8; read_len];
            let mut msgs = [
                I2cMsg {
                    addr,
                    flags: 0,
                    len: tx.len() as u16,
                    buf: tx.as_mut_ptr(),
                },
                I2cMsg {
                    addr,
                    flags: I2C_M_RD,
                    len: rx.len() as u16,
                    buf: rx.as_mut_ptr(),
                },
            ];
            let data = I2cRdwrIoctlData {
                msgs: msgs.as_mut_ptr(),
                nmsgs: msgs.len() as u32,
            };

            // SAFETY: msgs points at two valid i2c_msg entries whose
            // buffers outlive the ioctl; the kernel writes at most
            // rx.len() bytes into the read buffer.
            unsafe { i2c_rdwr(file.as_raw_fd(), &data) }
                .map_err(|e| Error::Transaction(format!("I2C_RDWR ioctl failed: {}", e)))?;

            Ok::<Vec<u8>, Error>(rx)
        })
        .await
        .map_err(|e| Error::Transaction(format!("bus worker task failed: {}", e)))??;

        trace!(addr = format!("0x{:02x}", addr), data = %hex::encode(&rx), "I2C exchange complete");
        Ok(rx)
    }
}
