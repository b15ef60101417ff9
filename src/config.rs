//! Configuration baked into the launcher binary.
//!
//! Each value lives in a fixed-size static slot laid out as
//!
//! ```text
//! [ "LNCHSLOT" ][ kind tag, 4 bytes ][ value, NUL-terminated and NUL-padded ]
//! ```
//!
//! The slots are filled at compile time from the `LAUNCHER_TARGET_PATH`,
//! `LAUNCHER_OPTIONS` and `LAUNCHER_ENV` build environment variables, and can
//! be rewritten in a finished binary with [`crate::stamp`]. Slots are read
//! through [`std::hint::black_box`] so the compiler never folds the build-time
//! value into the code that uses it.

use crate::error::LaunchError;

/// First bytes of every slot.
pub const SLOT_MAGIC: [u8; 8] = *b"LNCHSLOT";
/// Bytes before the value region of a slot.
pub const HEADER_LEN: usize = SLOT_MAGIC.len() + 4;

/// Which configuration value a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Target,
    Options,
    Env,
}

impl SlotKind {
    pub const ALL: [SlotKind; 3] = [SlotKind::Target, SlotKind::Options, SlotKind::Env];

    /// Bytes following [`SLOT_MAGIC`] in the slot header.
    pub const fn tag(self) -> [u8; 4] {
        match self {
            SlotKind::Target => *b"TRGT",
            SlotKind::Options => *b"OPTS",
            SlotKind::Env => *b"ENVS",
        }
    }

    /// Size of the value region, terminating NUL included.
    pub const fn capacity(self) -> usize {
        match self {
            SlotKind::Target => 1024,
            SlotKind::Options => 128,
            SlotKind::Env => 1024,
        }
    }

    /// Name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            SlotKind::Target => "target",
            SlotKind::Options => "options",
            SlotKind::Env => "env",
        }
    }

    /// Longest value the slot can hold.
    pub const fn max_value_len(self) -> usize {
        self.capacity() - 1
    }
}

/// Whether `bytes` contains [`SLOT_MAGIC`].
///
/// A value carrying the marker would look like a second slot header.
pub const fn contains_magic(bytes: &[u8]) -> bool {
    let mut start = 0;
    while start + SLOT_MAGIC.len() <= bytes.len() {
        let mut i = 0;
        while i < SLOT_MAGIC.len() && bytes[start + i] == SLOT_MAGIC[i] {
            i += 1;
        }
        if i == SLOT_MAGIC.len() {
            return true;
        }
        start += 1;
    }
    false
}

/// Build a slot image for `kind` holding `value` (empty when `None`).
pub const fn slot<const N: usize>(kind: SlotKind, value: Option<&str>) -> [u8; N] {
    assert!(
        N == HEADER_LEN + kind.capacity(),
        "slot length does not match its kind"
    );
    let mut buf = [0u8; N];
    let tag = kind.tag();
    let mut i = 0;
    while i < SLOT_MAGIC.len() {
        buf[i] = SLOT_MAGIC[i];
        i += 1;
    }
    let mut i = 0;
    while i < tag.len() {
        buf[SLOT_MAGIC.len() + i] = tag[i];
        i += 1;
    }
    if let Some(value) = value {
        let bytes = value.as_bytes();
        assert!(
            bytes.len() <= kind.max_value_len(),
            "baked launcher value does not fit its slot"
        );
        assert!(
            !contains_magic(bytes),
            "baked launcher value contains the slot marker"
        );
        let mut i = 0;
        while i < bytes.len() {
            buf[HEADER_LEN + i] = bytes[i];
            i += 1;
        }
    }
    buf
}

const TARGET_LEN: usize = HEADER_LEN + SlotKind::Target.capacity();
const OPTIONS_LEN: usize = HEADER_LEN + SlotKind::Options.capacity();
const ENV_LEN: usize = HEADER_LEN + SlotKind::Env.capacity();

#[used]
static TARGET_SLOT: [u8; TARGET_LEN] =
    slot::<TARGET_LEN>(SlotKind::Target, option_env!("LAUNCHER_TARGET_PATH"));
#[used]
static OPTIONS_SLOT: [u8; OPTIONS_LEN] =
    slot::<OPTIONS_LEN>(SlotKind::Options, option_env!("LAUNCHER_OPTIONS"));
#[used]
static ENV_SLOT: [u8; ENV_LEN] = slot::<ENV_LEN>(SlotKind::Env, option_env!("LAUNCHER_ENV"));

fn load<const N: usize>(slot: &'static [u8; N]) -> &'static [u8] {
    std::hint::black_box(slot)
}

/// The bytes stored in a slot's value region, up to the first NUL.
pub fn value_bytes(slot: &[u8]) -> &[u8] {
    let region = slot.get(HEADER_LEN..).unwrap_or_default();
    let end = region.iter().position(|&b| b == 0).unwrap_or(region.len());
    &region[..end]
}

/// Decode the value region of a slot of the given kind.
pub fn decode(kind: SlotKind, slot: &[u8]) -> Result<String, LaunchError> {
    String::from_utf8(value_bytes(slot).to_vec())
        .map_err(|_| LaunchError::InvalidSlot { slot: kind.name() })
}

/// Target, options and environment assignments of one launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Path of the application to launch.
    pub target: String,
    /// Comma-separated option tokens.
    pub options: String,
    /// Comma-separated `KEY=VALUE` assignments.
    pub env: String,
}

impl LauncherConfig {
    /// Configuration with the given target, option list and assignments.
    pub fn new(
        target: impl Into<String>,
        options: impl Into<String>,
        env: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            options: options.into(),
            env: env.into(),
        }
    }

    /// The configuration baked into the running binary.
    pub fn baked() -> Result<Self, LaunchError> {
        Ok(Self {
            target: decode(SlotKind::Target, load(&TARGET_SLOT))?,
            options: decode(SlotKind::Options, load(&OPTIONS_SLOT))?,
            env: decode(SlotKind::Env, load(&ENV_SLOT))?,
        })
    }

    /// The value stored in the slot of `kind`.
    pub fn get(&self, kind: SlotKind) -> &str {
        match kind {
            SlotKind::Target => &self.target,
            SlotKind::Options => &self.options,
            SlotKind::Env => &self.env,
        }
    }

    /// Mutable access to the value stored in the slot of `kind`.
    pub fn get_mut(&mut self, kind: SlotKind) -> &mut String {
        match kind {
            SlotKind::Target => &mut self.target,
            SlotKind::Options => &mut self.options,
            SlotKind::Env => &mut self.env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_layout() {
        let s = slot::<OPTIONS_LEN>(SlotKind::Options, Some("nonblocking"));
        assert_eq!(&s[..8], b"LNCHSLOT");
        assert_eq!(&s[8..12], b"OPTS");
        assert_eq!(&s[12..23], b"nonblocking");
        assert!(s[23..].iter().all(|&b| b == 0));
    }

    #[test]
    fn unset_slot_is_empty() {
        let s = slot::<ENV_LEN>(SlotKind::Env, None);
        assert_eq!(decode(SlotKind::Env, &s).unwrap(), "");
    }

    #[test]
    fn decode_stops_at_nul() {
        let mut s = slot::<TARGET_LEN>(SlotKind::Target, Some("/usr/bin/tool"));
        assert_eq!(decode(SlotKind::Target, &s).unwrap(), "/usr/bin/tool");
        s[HEADER_LEN + 4] = 0;
        assert_eq!(decode(SlotKind::Target, &s).unwrap(), "/usr");
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let mut s = slot::<TARGET_LEN>(SlotKind::Target, None);
        s[HEADER_LEN] = 0xff;
        let err = decode(SlotKind::Target, &s).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidSlot { slot: "target" }));
    }

    #[test]
    fn baked_slots_carry_headers() {
        for (slot, kind) in [
            (&TARGET_SLOT[..], SlotKind::Target),
            (&OPTIONS_SLOT[..], SlotKind::Options),
            (&ENV_SLOT[..], SlotKind::Env),
        ] {
            assert_eq!(&slot[..8], &SLOT_MAGIC);
            assert_eq!(&slot[8..12], &kind.tag());
            assert_eq!(slot.len(), HEADER_LEN + kind.capacity());
        }
        let baked = LauncherConfig::baked().unwrap();
        assert_eq!(baked.target, option_env!("LAUNCHER_TARGET_PATH").unwrap_or(""));
        assert_eq!(baked.options, option_env!("LAUNCHER_OPTIONS").unwrap_or(""));
        assert_eq!(baked.env, option_env!("LAUNCHER_ENV").unwrap_or(""));
    }

    #[test]
    fn marker_detection() {
        assert!(contains_magic(b"LNCHSLOT"));
        assert!(contains_magic(b"NOTE=LNCHSLOTENVS"));
        assert!(!contains_magic(b"LNCHSLO"));
        assert!(!contains_magic(b"LNCH SLOT"));
        assert!(!contains_magic(b""));
    }

    #[test]
    fn accessors_follow_kind() {
        let mut config = LauncherConfig::new("/bin/tool", "nonblocking", "A=1");
        assert_eq!(config.get(SlotKind::Target), "/bin/tool");
        config.get_mut(SlotKind::Env).push_str(",B=2");
        assert_eq!(config.env, "A=1,B=2");
    }
}
