//! Rewriting the configuration slots of a launcher image.
//!
//! A launcher copied under a new name and stamped with a different target is
//! an alias for that target. Stamping only touches the value regions of the
//! three slots, so the rest of the image stays byte-for-byte identical.

use crate::config::{self, HEADER_LEN, LauncherConfig, SLOT_MAGIC, SlotKind, contains_magic};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StampError {
    #[error("no {slot} slot found; is this a launcher binary?")]
    SlotNotFound { slot: &'static str },

    #[error("found {count} {slot} slots, expected exactly one")]
    DuplicateSlot { slot: &'static str, count: usize },

    #[error("{slot} value is {len} bytes long, the slot holds at most {max}")]
    ValueTooLong {
        slot: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{slot} value contains a NUL byte")]
    NulByte { slot: &'static str },

    #[error("{slot} value contains the slot marker `LNCHSLOT`")]
    ContainsMarker { slot: &'static str },

    #[error("{slot} slot is truncated")]
    Truncated { slot: &'static str },

    #[error("{slot} slot does not hold valid UTF-8")]
    InvalidUtf8 { slot: &'static str },
}

fn header(kind: SlotKind) -> Vec<u8> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(&SLOT_MAGIC);
    header.extend_from_slice(&kind.tag());
    header
}

/// Offset of the single slot of `kind` in `image`.
pub fn locate(image: &[u8], kind: SlotKind) -> Result<usize, StampError> {
    let header = header(kind);
    let mut found = image
        .windows(header.len())
        .enumerate()
        .filter(|(_, window)| *window == header.as_slice())
        .map(|(offset, _)| offset);
    let Some(offset) = found.next() else {
        return Err(StampError::SlotNotFound { slot: kind.name() });
    };
    let extra = found.count();
    if extra > 0 {
        return Err(StampError::DuplicateSlot {
            slot: kind.name(),
            count: extra + 1,
        });
    }
    if image.len() < offset + HEADER_LEN + kind.capacity() {
        return Err(StampError::Truncated { slot: kind.name() });
    }
    Ok(offset)
}

fn check_value(kind: SlotKind, value: &str) -> Result<(), StampError> {
    if value.contains('\0') {
        return Err(StampError::NulByte { slot: kind.name() });
    }
    if contains_magic(value.as_bytes()) {
        return Err(StampError::ContainsMarker { slot: kind.name() });
    }
    if value.len() > kind.max_value_len() {
        return Err(StampError::ValueTooLong {
            slot: kind.name(),
            len: value.len(),
            max: kind.max_value_len(),
        });
    }
    Ok(())
}

/// Write `config` into the slots of a launcher image.
///
/// Every slot is located and every value checked before the first byte is
/// written, so a failed stamp leaves `image` untouched.
pub fn stamp_image(image: &mut [u8], config: &LauncherConfig) -> Result<(), StampError> {
    let mut plan = Vec::with_capacity(SlotKind::ALL.len());
    for kind in SlotKind::ALL {
        let value = config.get(kind);
        check_value(kind, value)?;
        plan.push((locate(image, kind)?, kind, value));
    }
    for (offset, kind, value) in plan {
        let region = &mut image[offset + HEADER_LEN..offset + HEADER_LEN + kind.capacity()];
        region.fill(0);
        region[..value.len()].copy_from_slice(value.as_bytes());
        tracing::debug!(slot = kind.name(), offset, value, "stamped slot");
    }
    Ok(())
}

/// Read the configuration stored in a launcher image.
pub fn read_image(image: &[u8]) -> Result<LauncherConfig, StampError> {
    let mut config = LauncherConfig::default();
    for kind in SlotKind::ALL {
        let offset = locate(image, kind)?;
        let slot = &image[offset..offset + HEADER_LEN + kind.capacity()];
        *config.get_mut(kind) = String::from_utf8(config::value_bytes(slot).to_vec())
            .map_err(|_| StampError::InvalidUtf8 { slot: kind.name() })?;
    }
    Ok(config)
}
