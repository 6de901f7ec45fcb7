use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Gap inserted between consecutive poses when nothing else is configured.
pub const DEFAULT_TRANSITION_GAP_SECS: u64 = 5;

/// One timed pose in a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceItem {
    pub id: String,
    /// Duration in seconds.
    pub duration_secs: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl SequenceItem {
    pub fn new(id: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            id: id.into(),
            duration_secs,
            name: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            id: id.into(),
            duration_secs,
            name: Some(name.into()),
        }
    }

    /// Display label, falling back to the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Reject an empty list, any zero-length pose, or poses whose sum overflows.
pub fn validate_items(items: &[SequenceItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCollection("sequence items".into()));
    }
    if let Some(item) = items.iter().find(|i| i.duration_secs == 0) {
        return Err(ValidationError::InvalidValue {
            field: format!("items[{}].duration_secs", item.id),
            message: "duration must be greater than zero".into(),
        });
    }
    sequence_total_secs(items, 0)?;
    Ok(())
}

/// All poses plus one gap between each consecutive pair.
pub fn sequence_total_secs(items: &[SequenceItem], gap: u64) -> Result<u64, ValidationError> {
    let poses = items
        .iter()
        .try_fold(0u64, |acc, i| acc.checked_add(i.duration_secs));
    let gaps = u64::try_from(items.len().saturating_sub(1))
        .ok()
        .and_then(|n| n.checked_mul(gap));
    poses
        .zip(gaps)
        .and_then(|(poses, gaps)| poses.checked_add(gaps))
        .ok_or_else(|| total_overflow())
}

fn total_overflow() -> ValidationError {
    ValidationError::InvalidValue {
        field: "total_duration".into(),
        message: "total duration overflows".into(),
    }
}

/// A named, ordered practice as stored in a practice file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSequence {
    pub name: String,
    #[serde(default = "default_transition_gap")]
    pub transition_gap_secs: u64,
    pub items: Vec<SequenceItem>,
}

fn default_transition_gap() -> u64 {
    DEFAULT_TRANSITION_GAP_SECS
}

impl PracticeSequence {
    /// A short Surya Namaskar A flow.
    pub fn sun_salutation() -> Self {
        Self {
            name: "Sun Salutation A".into(),
            transition_gap_secs: DEFAULT_TRANSITION_GAP_SECS,
            items: vec![
                SequenceItem::named("tadasana", "Mountain", 30),
                SequenceItem::named("urdhva-hastasana", "Upward Salute", 15),
                SequenceItem::named("uttanasana", "Standing Forward Fold", 30),
                SequenceItem::named("ardha-uttanasana", "Halfway Lift", 15),
                SequenceItem::named("chaturanga", "Four-Limbed Staff", 15),
                SequenceItem::named("urdhva-mukha-svanasana", "Upward Dog", 20),
                SequenceItem::named("adho-mukha-svanasana", "Downward Dog", 45),
                SequenceItem::named("savasana", "Corpse", 60),
            ],
        }
    }

    /// Load a practice from a `.toml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let practice: Self = read_by_extension(path)?;
        validate_items(&practice.items)?;
        sequence_total_secs(&practice.items, practice.transition_gap_secs)?;
        Ok(practice)
    }
}

impl Default for PracticeSequence {
    fn default() -> Self {
        Self::sun_salutation()
    }
}

/// One exercise slot in an interval workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Optional reference into the pose/exercise library.
    #[serde(default)]
    pub ref_id: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ref_id: None,
        }
    }
}

/// Work/rest cycle repeated over `exercises` for `rounds` rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalConfig {
    pub work_secs: u64,
    pub rest_secs: u64,
    pub rounds: u32,
    pub exercises: Vec<Exercise>,
}

impl IntervalConfig {
    /// Zero rest is allowed; zero work, zero rounds, or no exercises are not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exercises.is_empty() {
            return Err(ValidationError::EmptyCollection("interval exercises".into()));
        }
        if self.rounds == 0 {
            return Err(ValidationError::InvalidValue {
                field: "rounds".into(),
                message: "at least one round is required".into(),
            });
        }
        if self.work_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "work_secs".into(),
                message: "work duration must be greater than zero".into(),
            });
        }
        self.total_duration_secs()?;
        Ok(())
    }

    /// `rounds * exercises * (work + rest)`.
    pub fn total_duration_secs(&self) -> Result<u64, ValidationError> {
        u64::try_from(self.exercises.len())
            .ok()
            .and_then(|n| n.checked_mul(u64::from(self.rounds)))
            .zip(self.work_secs.checked_add(self.rest_secs))
            .and_then(|(slots, cycle)| slots.checked_mul(cycle))
            .ok_or_else(|| total_overflow())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config: Self = read_by_extension(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            work_secs: 20,
            rest_secs: 10,
            rounds: 3,
            exercises: vec![
                Exercise::new("Chair Pulses"),
                Exercise::new("Plank Hold"),
                Exercise::new("Crescent Lunge Twists"),
                Exercise::new("Boat Crunches"),
            ],
        }
    }
}

fn read_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Ok(toml::from_str(&content)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_salutation_is_valid() {
        let p = PracticeSequence::default();
        assert_eq!(p.items.len(), 8);
        assert!(validate_items(&p.items).is_ok());
        assert_eq!(
            sequence_total_secs(&p.items, 0),
            Ok(30 + 15 + 30 + 15 + 15 + 20 + 45 + 60)
        );
        assert_eq!(sequence_total_secs(&p.items, 5), Ok(230 + 7 * 5));
    }

    #[test]
    fn empty_items_rejected() {
        assert_eq!(
            validate_items(&[]),
            Err(ValidationError::EmptyCollection("sequence items".into()))
        );
    }

    #[test]
    fn zero_duration_rejected() {
        let items = vec![SequenceItem::new("a", 10), SequenceItem::new("b", 0)];
        assert!(matches!(
            validate_items(&items),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn interval_total_duration() {
        let cfg = IntervalConfig {
            work_secs: 20,
            rest_secs: 10,
            rounds: 2,
            exercises: vec![Exercise::new("A"), Exercise::new("B")],
        };
        assert_eq!(cfg.total_duration_secs(), Ok(120));
    }

    #[test]
    fn overflowing_pose_durations_rejected() {
        let items = vec![SequenceItem::new("a", u64::MAX), SequenceItem::new("b", 10)];
        assert_eq!(
            validate_items(&items),
            Err(total_overflow())
        );

        let items = vec![SequenceItem::new("a", u64::MAX - 1), SequenceItem::new("b", 1)];
        assert!(validate_items(&items).is_ok());
        assert!(sequence_total_secs(&items, 1).is_err());
    }

    #[test]
    fn overflowing_interval_total_rejected() {
        let cfg = IntervalConfig {
            work_secs: u64::MAX,
            rest_secs: 1,
            rounds: 1,
            exercises: vec![Exercise::new("A")],
        };
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));

        let cfg = IntervalConfig {
            work_secs: u64::MAX / 2,
            rest_secs: 0,
            rounds: 3,
            exercises: vec![Exercise::new("A")],
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn practice_file_with_overflowing_gap_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        std::fs::write(
            &path,
            format!(
                r#"{{"name":"huge","transition_gap_secs":{},"items":[{{"id":"a","duration_secs":10}},{{"id":"b","duration_secs":10}}]}}"#,
                u64::MAX
            ),
        )
        .unwrap();
        assert!(matches!(
            PracticeSequence::from_path(&path),
            Err(crate::error::CoreError::Validation(_))
        ));
    }

    #[test]
    fn interval_validation() {
        let mut cfg = IntervalConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.rest_secs = 0;
        assert!(cfg.validate().is_ok());
        cfg.rounds = 0;
        assert!(cfg.validate().is_err());
        cfg.rounds = 1;
        cfg.exercises.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn practice_parses_from_toml_with_default_gap() {
        let src = r#"
            name = "Short"

            [[items]]
            id = "tree"
            duration_secs = 30

            [[items]]
            id = "warrior-2"
            name = "Warrior II"
            duration_secs = 45
        "#;
        let p: PracticeSequence = toml::from_str(src).unwrap();
        assert_eq!(p.transition_gap_secs, DEFAULT_TRANSITION_GAP_SECS);
        assert_eq!(p.items[0].label(), "tree");
        assert_eq!(p.items[1].label(), "Warrior II");
    }

    #[test]
    fn practice_loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.json");
        std::fs::write(
            &path,
            r#"{"name":"Flow","transition_gap_secs":3,"items":[{"id":"a","duration_secs":10}]}"#,
        )
        .unwrap();
        let p = PracticeSequence::from_path(&path).unwrap();
        assert_eq!(p.transition_gap_secs, 3);
        assert_eq!(p.items.len(), 1);
    }

    #[test]
    fn practice_file_with_no_items_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "name = \"Empty\"\nitems = []\n").unwrap();
        assert!(PracticeSequence::from_path(&path).is_err());
    }
}
