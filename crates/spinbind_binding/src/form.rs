//! Form integration
//!
//! A named binding contributes two fields to a form submission: the primary
//! field carrying the host's raw text, and a read-only `{name}_display`
//! mirror carrying the authoritative value. The mirror stays correct while
//! the primary field's text is mid-edit.

use spinbind_core::number::format_number;

/// One field of a form submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormEntry {
    pub name: String,
    pub value: String,
    pub read_only: bool,
}

/// Name of the mirror field for `name`
pub fn display_name(name: &str) -> String {
    format!("{}_display", name)
}

/// Form entries for a binding named `name`
pub fn entries(name: Option<&str>, raw: String, authoritative: f64) -> Vec<FormEntry> {
    let Some(name) = name else {
        return Vec::new();
    };
    vec![
        FormEntry {
            name: name.to_string(),
            value: raw,
            read_only: false,
        },
        FormEntry {
            name: display_name(name),
            value: format_number(authoritative),
            read_only: true,
        },
    ]
}
