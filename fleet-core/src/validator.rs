//! Field-level validation of ship drafts.

use std::ops::RangeInclusive;

use chrono::Datelike;

use crate::domain::ShipDraft;
use crate::error::{FleetError, Result};

/// Accepted length of `name` and `planet`, in characters.
pub const TEXT_LENGTH: RangeInclusive<usize> = 1..=50;
/// Accepted crew size.
pub const CREW_SIZE: RangeInclusive<i32> = 1..=9999;
/// Accepted cruise speed.
pub const SPEED: RangeInclusive<f64> = 0.01..=0.99;
/// Accepted production years.
pub const PROD_YEAR: RangeInclusive<i32> = 2800..=3019;

/// Which operation a draft is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every required field must be present.
    Create,
    /// Only the supplied fields are checked.
    Edit,
}

/// Validate a draft, failing on the first violated constraint.
pub fn validate(draft: &ShipDraft, mode: ValidationMode) -> Result<()> {
    if mode == ValidationMode::Create {
        require_fields(draft)?;
    }

    if let Some(name) = &draft.name {
        check_text("name", name)?;
    }
    if let Some(planet) = &draft.planet {
        check_text("planet", planet)?;
    }
    if let Some(crew_size) = draft.crew_size {
        if !CREW_SIZE.contains(&crew_size) {
            return Err(FleetError::invalid("Incorrect Ship.crewSize"));
        }
    }
    if let Some(speed) = draft.speed {
        if !SPEED.contains(&speed) {
            return Err(FleetError::invalid("Incorrect Ship.speed"));
        }
    }
    if let Some(prod_date) = draft.prod_date {
        if !PROD_YEAR.contains(&prod_date.year()) {
            return Err(FleetError::invalid("Incorrect Ship.prodDate"));
        }
    }
    Ok(())
}

fn require_fields(draft: &ShipDraft) -> Result<()> {
    let missing = [
        ("name", draft.name.is_none()),
        ("planet", draft.planet.is_none()),
        ("shipType", draft.ship_type.is_none()),
        ("prodDate", draft.prod_date.is_none()),
        ("speed", draft.speed.is_none()),
        ("crewSize", draft.crew_size.is_none()),
    ]
    .into_iter()
    .find_map(|(field, absent)| absent.then_some(field));

    match missing {
        Some(field) => Err(FleetError::invalid(format!("Ship.{field} is required"))),
        None => Ok(()),
    }
}

fn check_text(field: &str, value: &str) -> Result<()> {
    if TEXT_LENGTH.contains(&value.chars().count()) {
        Ok(())
    } else {
        Err(FleetError::invalid(format!("Incorrect Ship.{field}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{ValidationMode, validate};
    use crate::domain::{ShipDraft, ShipType};
    use crate::error::FleetError;
    use chrono::{TimeZone, Utc};

    fn complete_draft() -> ShipDraft {
        ShipDraft {
            name: Some("Nostromo".to_string()),
            planet: Some("Thedus".to_string()),
            ship_type: Some(ShipType::Transport),
            prod_date: Some(Utc.with_ymd_and_hms(2990, 6, 1, 0, 0, 0).unwrap()),
            used: None,
            speed: Some(0.47),
            crew_size: Some(7),
        }
    }

    fn assert_invalid(draft: &ShipDraft, mode: ValidationMode) {
        match validate(draft, mode) {
            Err(FleetError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn complete_draft_passes_create() {
        assert_eq!(validate(&complete_draft(), ValidationMode::Create), Ok(()));
    }

    #[test]
    fn create_requires_every_field_but_used() {
        let strip: [fn(&mut ShipDraft); 6] = [
            |draft: &mut ShipDraft| draft.name = None,
            |draft: &mut ShipDraft| draft.planet = None,
            |draft: &mut ShipDraft| draft.ship_type = None,
            |draft: &mut ShipDraft| draft.prod_date = None,
            |draft: &mut ShipDraft| draft.speed = None,
            |draft: &mut ShipDraft| draft.crew_size = None,
        ];
        for remove in strip {
            let mut draft = complete_draft();
            remove(&mut draft);
            assert_invalid(&draft, ValidationMode::Create);
        }
    }

    #[test]
    fn edit_accepts_empty_draft() {
        assert_eq!(validate(&ShipDraft::default(), ValidationMode::Edit), Ok(()));
    }

    #[test]
    fn text_fields_must_hold_one_to_fifty_chars() {
        for mode in [ValidationMode::Create, ValidationMode::Edit] {
            let mut draft = complete_draft();
            draft.name = Some(String::new());
            assert_invalid(&draft, mode);

            let mut draft = complete_draft();
            draft.planet = Some("p".repeat(51));
            assert_invalid(&draft, mode);

            let mut draft = complete_draft();
            draft.name = Some("n".to_string());
            draft.planet = Some("p".repeat(50));
            assert_eq!(validate(&draft, mode), Ok(()));
        }
    }

    #[test]
    fn text_length_counts_characters() {
        let mut draft = complete_draft();
        draft.name = Some("Ж".repeat(50));
        assert_eq!(validate(&draft, ValidationMode::Edit), Ok(()));
    }

    #[test]
    fn crew_size_bounds_are_inclusive() {
        for (crew_size, ok) in [(0, false), (1, true), (9999, true), (10000, false)] {
            let draft = ShipDraft {
                crew_size: Some(crew_size),
                ..ShipDraft::default()
            };
            assert_eq!(validate(&draft, ValidationMode::Edit).is_ok(), ok, "{crew_size}");
        }
    }

    #[test]
    fn speed_bounds_are_inclusive() {
        for (speed, ok) in [(0.0, false), (0.01, true), (0.99, true), (0.991, false)] {
            let draft = ShipDraft {
                speed: Some(speed),
                ..ShipDraft::default()
            };
            assert_eq!(validate(&draft, ValidationMode::Edit).is_ok(), ok, "{speed}");
        }
    }

    #[test]
    fn speed_rejects_nan() {
        let draft = ShipDraft {
            speed: Some(f64::NAN),
            ..ShipDraft::default()
        };
        assert_invalid(&draft, ValidationMode::Edit);
    }

    #[test]
    fn production_year_bounds_are_inclusive() {
        let cases = [
            (Utc.with_ymd_and_hms(2799, 12, 31, 23, 59, 59).unwrap(), false),
            (Utc.with_ymd_and_hms(2800, 1, 1, 0, 0, 0).unwrap(), true),
            (Utc.with_ymd_and_hms(3019, 12, 31, 23, 59, 59).unwrap(), true),
            (Utc.with_ymd_and_hms(3020, 1, 1, 0, 0, 0).unwrap(), false),
        ];
        for (prod_date, ok) in cases {
            let draft = ShipDraft {
                prod_date: Some(prod_date),
                ..ShipDraft::default()
            };
            assert_eq!(validate(&draft, ValidationMode::Edit).is_ok(), ok, "{prod_date}");
        }
    }

    #[test]
    fn reports_first_violation_only() {
        let mut draft = complete_draft();
        draft.name = Some(String::new());
        draft.crew_size = Some(0);

        assert_eq!(
            validate(&draft, ValidationMode::Create),
            Err(FleetError::invalid("Incorrect Ship.name"))
        );
    }
}
