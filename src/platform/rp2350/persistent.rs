//! Persistent memory placement
//!
//! The block lives in the `.uninit` section, which the runtime leaves
//! untouched on reset, so its contents survive a warm or watchdog reboot.
//! Whether they are still intact is decided by `PersistentLogStore::open`.

use core::mem::MaybeUninit;
use core::ptr::addr_of_mut;
use core::sync::atomic::{AtomicBool, Ordering};

use brickpico_core::log::PersistentMemoryBlock;

use crate::platform::{PlatformError, Result};

#[link_section = ".uninit.brickpico.persistent"]
static mut PERSISTENT_BLOCK: MaybeUninit<PersistentMemoryBlock> = MaybeUninit::uninit();

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Hand out the persistent block; succeeds once per boot.
pub fn take_persistent_block() -> Result<&'static mut PersistentMemoryBlock> {
    if TAKEN.swap(true, Ordering::AcqRel) {
        return Err(PlatformError::PersistentMemoryTaken);
    }
    // SAFETY: handed out at most once (TAKEN), and the block consists of
    // integers only, so whatever the RAM holds is a valid value.
    Ok(unsafe { (*addr_of_mut!(PERSISTENT_BLOCK)).assume_init_mut() })
}
