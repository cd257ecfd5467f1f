use serde::Serialize;

use super::donations::DonationAmount;

pub const MEALS_PER_PERSON: u64 = 3;
pub const SHARE_TITLE: &str = "I donated to Nobel Hands";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTier {
    Family,
    Meal,
    TeaAndSnacks,
    Kindness,
}

impl ImpactTier {
    pub fn for_amount(amount: DonationAmount) -> Self {
        match amount.whole_rupees() {
            500.. => ImpactTier::Family,
            100.. => ImpactTier::Meal,
            50.. => ImpactTier::TeaAndSnacks,
            _ => ImpactTier::Kindness,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ImpactTier::Family => "You've fed an entire family today!",
            ImpactTier::Meal => "You've provided a nutritious meal!",
            ImpactTier::TeaAndSnacks => "You've given tea and snacks to someone in need!",
            ImpactTier::Kindness => "Your kindness makes a difference!",
        }
    }
}

pub fn people_helped(amount: DonationAmount) -> u64 {
    (amount.whole_rupees() / 100).max(1)
}

pub fn meals(amount: DonationAmount) -> u64 {
    people_helped(amount) * MEALS_PER_PERSON
}

/// What the success screen shows once a donation has gone through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub amount: DonationAmount,
    pub heading: String,
    pub tier: ImpactTier,
    pub message: &'static str,
    pub people_helped: u64,
    pub meals: u64,
    pub transaction_id: String,
    pub share_title: &'static str,
    pub share_text: String,
}

impl ImpactSummary {
    pub fn new(amount: DonationAmount, donor_name: Option<&str>, transaction_id: &str) -> Self {
        let tier = ImpactTier::for_amount(amount);
        let heading = match donor_name {
            Some(name) => format!("Thank You, {}!", name),
            None => "Thank You!".to_string(),
        };

        Self {
            amount,
            heading,
            tier,
            message: tier.message(),
            people_helped: people_helped(amount),
            meals: meals(amount),
            transaction_id: transaction_id.to_string(),
            share_title: SHARE_TITLE,
            share_text: share_text(amount),
        }
    }
}

pub fn share_text(amount: DonationAmount) -> String {
    format!(
        "I just donated ₹{} to help feed the hungry through Nobel Hands. Join me in making a difference!",
        amount
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(amount: u64) -> DonationAmount {
        DonationAmount::from_whole_rupees(amount).unwrap()
    }

    #[test]
    fn tiers_step_at_thresholds() {
        assert_eq!(ImpactTier::for_amount(rupees(1)), ImpactTier::Kindness);
        assert_eq!(ImpactTier::for_amount(rupees(49)), ImpactTier::Kindness);
        assert_eq!(ImpactTier::for_amount(rupees(50)), ImpactTier::TeaAndSnacks);
        assert_eq!(ImpactTier::for_amount(rupees(99)), ImpactTier::TeaAndSnacks);
        assert_eq!(ImpactTier::for_amount(rupees(100)), ImpactTier::Meal);
        assert_eq!(ImpactTier::for_amount(rupees(499)), ImpactTier::Meal);
        assert_eq!(ImpactTier::for_amount(rupees(500)), ImpactTier::Family);
        assert_eq!(ImpactTier::for_amount(rupees(10_000)), ImpactTier::Family);
    }

    #[test]
    fn fractional_amounts_below_threshold() {
        let amount = DonationAmount::from_rupees(49.99).unwrap();
        assert_eq!(ImpactTier::for_amount(amount), ImpactTier::Kindness);
    }

    #[test]
    fn people_helped_has_a_floor_of_one() {
        assert_eq!(people_helped(rupees(2)), 1);
        assert_eq!(people_helped(rupees(99)), 1);
        assert_eq!(people_helped(rupees(199)), 1);
        assert_eq!(people_helped(rupees(250)), 2);
        assert_eq!(meals(rupees(250)), 6);
    }

    #[test]
    fn family_donation() {
        let summary = ImpactSummary::new(rupees(500), Some("Asha"), "NH1");
        assert!(summary.message.contains("fed an entire family"));
        assert_eq!(summary.people_helped, 5);
        assert_eq!(summary.meals, 15);
        assert_eq!(summary.heading, "Thank You, Asha!");
    }

    #[test]
    fn smallest_donation() {
        let summary = ImpactSummary::new(rupees(2), None, "NH2");
        assert!(summary.message.contains("kindness makes a difference"));
        assert_eq!(summary.people_helped, 1);
        assert_eq!(summary.meals, 3);
        assert_eq!(summary.heading, "Thank You!");
        assert!(summary.share_text.starts_with("I just donated ₹2 "));
    }
}
