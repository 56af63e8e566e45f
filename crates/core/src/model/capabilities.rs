#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameEdit {
    Unrestricted,
    Readonly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteMode {
    /// Rows are removed from the file.
    Physical,
    /// Rows stay and a flag is set.
    Flag,
    Unsupported,
}

/// Which host edits the channel database can persist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub name_edit: NameEdit,
    pub delete_mode: DeleteMode,
    pub reorder: bool,
    pub skip: bool,
    pub lock: bool,
    pub hide: bool,
    pub favorites: bool,
}

impl Capabilities {
    /// Names are free text and deletes drop rows; the schema keeps no
    /// favorites or skip/lock/hide state, and program numbers are not
    /// reassigned by the store itself.
    pub const fn channel_db() -> Self {
        Self {
            name_edit: NameEdit::Unrestricted,
            delete_mode: DeleteMode::Physical,
            reorder: false,
            skip: false,
            lock: false,
            hide: false,
            favorites: false,
        }
    }
}
