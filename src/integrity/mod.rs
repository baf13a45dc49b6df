//! Integrity audit of a downloaded page directory
//!
//! The audit walks the expected domain from its lower bound and requires the
//! sorted directory listing to match the canonical filenames one for one. The
//! first mismatch is reported as a gap. Because artifact filenames use
//! fixed-width hex, sorting names as strings orders them by codepoint.

use crate::range::{Codepoint, Domain};
use crate::store::{ArtifactNaming, StoreError};
use std::fmt;
use std::fs;
use std::path::Path;

/// Result of an integrity audit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityReport {
    /// Every expected codepoint has its artifact
    Complete {
        /// Directory entries left over after the domain's upper bound
        unchecked: usize,
    },

    /// The first expected codepoint whose artifact is missing or misnamed
    Gap { first_missing: Codepoint },
}

impl IntegrityReport {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete { unchecked } => {
                write!(f, "integrity OK, {} entries beyond the domain", unchecked)
            }
            Self::Gap { first_missing } => write!(f, "integrity error at {}", first_missing),
        }
    }
}

/// Audits a list of filenames against `domain`
///
/// # Arguments
///
/// * `names` - Directory entry names, in any order
/// * `naming` - The canonical filename scheme
/// * `domain` - Expected codepoints, checked from `domain.lower`
pub fn audit_names<I>(names: I, naming: &ArtifactNaming, domain: Domain) -> IntegrityReport
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();

    let mut stored = names.iter();
    for expected in domain.iter() {
        match stored.next() {
            Some(name) if *name == naming.file_name(expected) => {}
            _ => {
                return IntegrityReport::Gap {
                    first_missing: expected,
                }
            }
        }
    }

    IntegrityReport::Complete {
        unchecked: stored.count(),
    }
}

/// Audits the artifact directory at `directory`
///
/// # Returns
///
/// * `Ok(IntegrityReport)` - The audit ran; a gap is a normal result
/// * `Err(StoreError)` - The directory could not be read
pub fn audit_directory(
    directory: &Path,
    naming: &ArtifactNaming,
    domain: Domain,
) -> Result<IntegrityReport, StoreError> {
    tracing::info!("Checking integrity of files at {}", directory.display());

    let entries = fs::read_dir(directory).map_err(|e| StoreError::io(directory, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(directory, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    tracing::debug!("Found {} entries", names.len());
    Ok(audit_names(names, naming, domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names_for(codepoints: impl IntoIterator<Item = u32>) -> Vec<String> {
        let naming = ArtifactNaming::default();
        codepoints
            .into_iter()
            .map(|c| naming.file_name(Codepoint(c)))
            .collect()
    }

    fn audit(names: Vec<String>) -> IntegrityReport {
        audit_names(names, &ArtifactNaming::default(), Domain::new(100, 200))
    }

    #[test]
    fn test_gap_in_middle() {
        let names = names_for((100..=150).chain(152..=160));
        assert_eq!(
            audit(names),
            IntegrityReport::Gap {
                first_missing: Codepoint(151)
            }
        );
    }

    #[test]
    fn test_empty_store_gaps_at_lower_bound() {
        assert_eq!(
            audit(Vec::new()),
            IntegrityReport::Gap {
                first_missing: Codepoint(100)
            }
        );
    }

    #[test]
    fn test_partial_store_gaps_after_last_file() {
        let names = names_for(100..=150);
        assert_eq!(
            audit(names),
            IntegrityReport::Gap {
                first_missing: Codepoint(151)
            }
        );
    }

    #[test]
    fn test_complete_store() {
        let names = names_for(100..=200);
        assert_eq!(audit(names), IntegrityReport::Complete { unchecked: 0 });
    }

    #[test]
    fn test_entries_beyond_domain_are_counted() {
        let names = names_for(100..=205);
        assert_eq!(audit(names), IntegrityReport::Complete { unchecked: 5 });
    }

    #[test]
    fn test_listing_order_does_not_matter() {
        let names = names_for((100..=200).rev());
        assert!(audit(names).is_complete());
    }

    #[test]
    fn test_stray_entry_reports_gap() {
        // ".keep" sorts before every artifact and derails the walk
        let mut names = names_for(100..=200);
        names.push(".keep".to_string());
        assert_eq!(
            audit(names),
            IntegrityReport::Gap {
                first_missing: Codepoint(100)
            }
        );
    }

    #[test]
    fn test_sort_is_numeric_across_widths() {
        // Four- and five-digit codepoints stay in numeric order
        let naming = ArtifactNaming::default();
        let domain = Domain::new(0xfffe, 0x10001);
        let names = names_for([0x10001, 0xfffe, 0x10000, 0xffff]);
        assert!(audit_names(names, &naming, domain).is_complete());
    }

    #[test]
    fn test_audit_directory() {
        let dir = TempDir::new().unwrap();
        for name in names_for((100..=150).chain(152..=160)) {
            fs::write(dir.path().join(name), b"page").unwrap();
        }

        let report =
            audit_directory(dir.path(), &ArtifactNaming::default(), Domain::new(100, 200)).unwrap();
        assert_eq!(
            report,
            IntegrityReport::Gap {
                first_missing: Codepoint(151)
            }
        );
    }

    #[test]
    fn test_audit_unreadable_directory() {
        let dir = TempDir::new().unwrap();
        let result = audit_directory(
            &dir.path().join("missing"),
            &ArtifactNaming::default(),
            Domain::new(100, 200),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let gap = IntegrityReport::Gap {
            first_missing: Codepoint(0x4e00),
        };
        assert_eq!(gap.to_string(), "integrity error at U+4E00");
    }
}
