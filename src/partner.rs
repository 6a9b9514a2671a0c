//! Partner registry: the ordered roster of signing-party roles.
//!
//! Every field belongs to exactly one partner. The registry owns the
//! ordered list of distinct non-empty partner names plus the "current"
//! selection used as the default assignment target for newly drawn fields.
//! Cascading effects on fields (rename rewrites, removal deletions) are
//! composed at the engine level; this module only guards the roster
//! invariants.

#[cfg(test)]
#[path = "partner_test.rs"]
mod partner_test;

use thiserror::Error;

/// Roster name used when a template carries no partner assignments at all.
pub const DEFAULT_PARTNER: &str = "First Party";

/// Per-partner color palette, assigned by roster position and cycled when
/// the roster outgrows it.
const PARTNER_COLORS: [&str; 8] = [
    "#D94B4B", "#3C7DD9", "#3FA56A", "#C98A2B", "#8A5BC7", "#C74E8A", "#3BA8A8", "#7A7A2B",
];

/// Errors from roster mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartnerError {
    /// A supplied partner name was empty or whitespace.
    #[error("partner name cannot be empty")]
    EmptyName,
    /// A supplied partner name already exists in the roster.
    #[error("partner \"{0}\" already exists")]
    DuplicateName(String),
    /// The referenced partner is not in the roster.
    #[error("unknown partner \"{0}\"")]
    UnknownPartner(String),
}

/// Ordered list of signer-role names plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct PartnerRegistry {
    partners: Vec<String>,
    current: Option<String>,
}

impl PartnerRegistry {
    /// Build a roster from observed partner values, dropping empty names
    /// and duplicates while preserving first-seen order. The current
    /// selection starts at the first entry.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut partners: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_owned();
            if !name.is_empty() && !partners.contains(&name) {
                partners.push(name);
            }
        }
        let current = partners.first().cloned();
        Self { partners, current }
    }

    /// A roster containing only the default partner.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_names([DEFAULT_PARTNER])
    }

    /// Roster entries in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.partners
    }

    /// The current default-assignment partner, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Select a partner as the default assignment target. Returns false if
    /// the name is not in the roster.
    pub fn set_current(&mut self, name: &str) -> bool {
        if self.partners.iter().any(|p| p == name) {
            self.current = Some(name.to_owned());
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.partners.iter().any(|p| p == name)
    }

    /// Roster position of a partner.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.partners.iter().position(|p| p == name)
    }

    /// Display color for a partner, keyed by roster position.
    #[must_use]
    pub fn color_for(&self, name: &str) -> &'static str {
        let index = self.position(name).unwrap_or(0);
        PARTNER_COLORS[index % PARTNER_COLORS.len()]
    }

    /// Add a partner. With no name supplied, generates the next free
    /// ordinal name ("Party 2", "Party 3", ...).
    ///
    /// # Errors
    ///
    /// Returns [`PartnerError::EmptyName`] for blank names and
    /// [`PartnerError::DuplicateName`] for names already in the roster.
    pub fn add(&mut self, name: Option<&str>) -> Result<String, PartnerError> {
        let name = match name {
            Some(explicit) => {
                let trimmed = explicit.trim();
                if trimmed.is_empty() {
                    return Err(PartnerError::EmptyName);
                }
                if self.contains(trimmed) {
                    return Err(PartnerError::DuplicateName(trimmed.to_owned()));
                }
                trimmed.to_owned()
            }
            None => self.next_ordinal_name(),
        };
        self.partners.push(name.clone());
        if self.current.is_none() {
            self.current = Some(name.clone());
        }
        Ok(name)
    }

    /// Rename a roster entry in place, preserving its position. The caller
    /// is responsible for rewriting fields that reference the old name in
    /// the same mutation (see [`crate::engine::EditorCore::rename_partner`]).
    ///
    /// # Errors
    ///
    /// Returns [`PartnerError::UnknownPartner`] if `old` is absent,
    /// [`PartnerError::EmptyName`] / [`PartnerError::DuplicateName`] for an
    /// invalid new name.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), PartnerError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(PartnerError::EmptyName);
        }
        if new != old && self.contains(new) {
            return Err(PartnerError::DuplicateName(new.to_owned()));
        }
        let Some(index) = self.position(old) else {
            return Err(PartnerError::UnknownPartner(old.to_owned()));
        };
        self.partners[index] = new.to_owned();
        if self.current.as_deref() == Some(old) {
            self.current = Some(new.to_owned());
        }
        Ok(())
    }

    /// Remove a roster entry. If it was the current selection, the current
    /// becomes the new first entry, or empty if none remain.
    ///
    /// # Errors
    ///
    /// Returns [`PartnerError::UnknownPartner`] if the name is absent.
    pub fn remove(&mut self, name: &str) -> Result<(), PartnerError> {
        let Some(index) = self.position(name) else {
            return Err(PartnerError::UnknownPartner(name.to_owned()));
        };
        self.partners.remove(index);
        if self.current.as_deref() == Some(name) {
            self.current = self.partners.first().cloned();
        }
        Ok(())
    }

    fn next_ordinal_name(&self) -> String {
        let mut n = self.partners.len() + 1;
        loop {
            let candidate = format!("Party {n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
