use crate::artifacts::core::CoreError;
use crate::artifacts::objects::object_type::ObjectType;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

/// Mode of a tree or index entry, in git's octal notation
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum EntryMode {
    File(FileMode),
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Object kind an entry with this mode points at
    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::File(_) => ObjectType::Blob,
            EntryMode::Directory => ObjectType::Tree,
        }
    }

    pub fn from_octal_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "100644" => Ok(EntryMode::File(FileMode::Regular)),
            "100755" => Ok(EntryMode::File(FileMode::Executable)),
            "40000" | "040000" => Ok(EntryMode::Directory),
            mode => Err(CoreError::malformed(format!("unknown entry mode {mode:?}")).into()),
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntryMode::File(FileMode::Regular), "100644")]
    #[case(EntryMode::File(FileMode::Executable), "100755")]
    #[case(EntryMode::Directory, "40000")]
    fn octal_form_round_trips(#[case] mode: EntryMode, #[case] octal: &str) {
        pretty_assertions::assert_eq!(mode.as_str(), octal);
        pretty_assertions::assert_eq!(EntryMode::from_octal_str(octal).unwrap(), mode);
    }

    #[rstest]
    fn rejects_unknown_modes() {
        assert!(EntryMode::from_octal_str("120000").is_err());
    }
}
