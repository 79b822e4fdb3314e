use crate::models::{Gender, RiskLevel};
use chrono::{Datelike, NaiveDate};

/// Whole years between `date_of_birth` and `today`, minus one when the
/// birthday has not yet occurred this year.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Maps (age, gender, trigger count) to a risk tier through the fixed
/// decision table. Higher tiers are checked before lower ones inside each
/// branch because the ranges overlap by construction.
///
/// A single trigger above age 30 has no covering rule and falls through to
/// `None`, as does any gender outside the two tabled values under 30.
pub fn risk_level(age: i32, gender: Gender, trigger_count: usize) -> RiskLevel {
    if trigger_count == 0 {
        return RiskLevel::None;
    }

    if age > 30 {
        if trigger_count >= 8 {
            return RiskLevel::EarlyOnset;
        }
        if trigger_count >= 6 {
            return RiskLevel::InDanger;
        }
        if trigger_count >= 2 {
            return RiskLevel::Borderline;
        }
        return RiskLevel::None;
    }

    match gender {
        Gender::Male => {
            if trigger_count >= 5 {
                RiskLevel::EarlyOnset
            } else if trigger_count >= 3 {
                RiskLevel::InDanger
            } else {
                RiskLevel::None
            }
        }
        Gender::Female => {
            if trigger_count >= 7 {
                RiskLevel::EarlyOnset
            } else if trigger_count >= 4 {
                RiskLevel::InDanger
            } else {
                RiskLevel::None
            }
        }
        Gender::Other => RiskLevel::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_thirty_table() {
        assert_eq!(risk_level(35, Gender::Male, 3), RiskLevel::Borderline);
        assert_eq!(risk_level(35, Gender::Female, 7), RiskLevel::InDanger);
        assert_eq!(risk_level(35, Gender::Male, 9), RiskLevel::EarlyOnset);
    }

    #[test]
    fn over_thirty_single_trigger_falls_through() {
        assert_eq!(risk_level(35, Gender::Female, 1), RiskLevel::None);
    }

    #[test]
    fn under_thirty_by_gender() {
        assert_eq!(risk_level(25, Gender::Male, 3), RiskLevel::InDanger);
        assert_eq!(risk_level(25, Gender::Male, 5), RiskLevel::EarlyOnset);
        assert_eq!(risk_level(25, Gender::Female, 7), RiskLevel::EarlyOnset);
        assert_eq!(risk_level(25, Gender::Female, 4), RiskLevel::InDanger);
        assert_eq!(risk_level(25, Gender::Female, 2), RiskLevel::None);
    }

    #[test]
    fn unrecognized_gender_under_thirty_is_none() {
        assert_eq!(risk_level(25, Gender::Other, 9), RiskLevel::None);
    }

    #[test]
    fn zero_triggers_short_circuit() {
        assert_eq!(risk_level(80, Gender::Male, 0), RiskLevel::None);
        assert_eq!(risk_level(12, Gender::Female, 0), RiskLevel::None);
    }

    #[test]
    fn thirty_uses_the_young_branch() {
        // The cutoff is strictly greater than 30.
        assert_eq!(risk_level(30, Gender::Male, 4), RiskLevel::InDanger);
        assert_eq!(risk_level(31, Gender::Male, 4), RiskLevel::Borderline);
    }

    #[test]
    fn age_corrects_for_not_yet_had_birthday() {
        let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let before_birthday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(age_on(dob, before_birthday), 34);
        assert_eq!(age_on(dob, on_birthday), 35);
    }
}
