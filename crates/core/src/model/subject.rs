//! Subject buckets used to group tests in listings.

use std::fmt;

/// Subject a test belongs to, derived from keywords in its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    GrandTest,
    BiochemFmt,
    MicroAnatomy,
    PsmDermaAnes,
    EntOphthalPsych,
    SurgeryOrthoRadio,
    PediatricsObg,
    ExtraEdge,
    General,
}

/// Keyword table checked in order; the first bucket with a matching keyword
/// wins. Matching is a case-insensitive substring test, so short keywords
/// like `gt` and `ent` also hit inside longer words.
const KEYWORDS: [(Subject, &[&str]); 8] = [
    (
        Subject::GrandTest,
        &["mega", "gt", "mock", "integrated", "fmg"],
    ),
    (Subject::BiochemFmt, &["biochem", "fmt"]),
    (Subject::MicroAnatomy, &["micro", "anat"]),
    (Subject::PsmDermaAnes, &["psm", "derma", "anes"]),
    (Subject::EntOphthalPsych, &["ent", "ophthal", "psychi"]),
    (Subject::SurgeryOrthoRadio, &["surg", "ortho", "radio"]),
    (Subject::PediatricsObg, &["obg", "pediatric"]),
    (Subject::ExtraEdge, &["extra"]),
];

impl Subject {
    pub const ALL: [Subject; 9] = [
        Subject::GrandTest,
        Subject::BiochemFmt,
        Subject::MicroAnatomy,
        Subject::PsmDermaAnes,
        Subject::EntOphthalPsych,
        Subject::SurgeryOrthoRadio,
        Subject::PediatricsObg,
        Subject::ExtraEdge,
        Subject::General,
    ];

    /// Classifies a test by its display name.
    #[must_use]
    pub fn from_test_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map_or(Subject::General, |(subject, _)| *subject)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Subject::GrandTest => "Grand Test",
            Subject::BiochemFmt => "Biochem / FMT",
            Subject::MicroAnatomy => "Micro / Anatomy",
            Subject::PsmDermaAnes => "PSM / Derma / Anes",
            Subject::EntOphthalPsych => "ENT / Ophthal / Psych",
            Subject::SurgeryOrthoRadio => "Surgery / Ortho / Radio",
            Subject::PediatricsObg => "Pediatrics / OBG",
            Subject::ExtraEdge => "Extra Edge",
            Subject::General => "General",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_bucket_has_a_keyword() {
        let cases = [
            ("MEGA GT 3", Subject::GrandTest),
            ("Mock 2", Subject::GrandTest),
            ("Integrated Test", Subject::GrandTest),
            ("FMG Revision", Subject::GrandTest),
            ("Biochemistry 1", Subject::BiochemFmt),
            ("FMT Part 2", Subject::BiochemFmt),
            ("Microbiology", Subject::MicroAnatomy),
            ("Anatomy Upper Limb", Subject::MicroAnatomy),
            ("PSM 4", Subject::PsmDermaAnes),
            ("Dermatology", Subject::PsmDermaAnes),
            ("Anesthesia", Subject::PsmDermaAnes),
            ("ENT", Subject::EntOphthalPsych),
            ("Ophthalmology", Subject::EntOphthalPsych),
            ("Psychiatry", Subject::EntOphthalPsych),
            ("Surgery 1", Subject::SurgeryOrthoRadio),
            ("Orthopedics", Subject::SurgeryOrthoRadio),
            ("Radiology", Subject::SurgeryOrthoRadio),
            ("OBG", Subject::PediatricsObg),
            ("Pediatrics", Subject::PediatricsObg),
            ("Extra Edge 5", Subject::ExtraEdge),
            ("Physiology", Subject::General),
        ];
        for (name, expected) in cases {
            assert_eq!(Subject::from_test_name(name), expected, "{name}");
        }
    }

    #[test]
    fn earlier_buckets_win() {
        assert_eq!(Subject::from_test_name("GT Surgery"), Subject::GrandTest);
        assert_eq!(Subject::from_test_name("Extra Micro"), Subject::MicroAnatomy);
        // `ent` inside a longer word still counts.
        assert_eq!(
            Subject::from_test_name("Pharmacology Assessment"),
            Subject::EntOphthalPsych
        );
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<_> = Subject::ALL.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Subject::ALL.len());
        assert_eq!(Subject::General.to_string(), "General");
    }
}
