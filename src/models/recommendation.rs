use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationProfile {
    pub recommended_amount: u64,
    pub impact: &'static str,
    pub reasoning: &'static str,
    pub frequency: &'static str,
}

pub const PROFILES: [DonationProfile; 4] = [
    DonationProfile {
        recommended_amount: 100,
        impact: "Feed 1 person a nutritious meal daily",
        reasoning: "Based on typical donation patterns, ₹100 creates meaningful impact while being accessible to most donors.",
        frequency: "weekly",
    },
    DonationProfile {
        recommended_amount: 50,
        impact: "Provide tea and snacks to 1 person",
        reasoning: "A smaller, regular contribution adds up! Many donors find ₹50 comfortable for frequent giving.",
        frequency: "bi-weekly",
    },
    DonationProfile {
        recommended_amount: 250,
        impact: "Feed 2-3 people nutritious meals",
        reasoning: "You can create significant impact! This amount helps multiple people and shows strong commitment to the cause.",
        frequency: "monthly",
    },
    DonationProfile {
        recommended_amount: 500,
        impact: "Feed an entire family for a day",
        reasoning: "Transform lives of a whole family! This generous amount provides comprehensive nutrition support.",
        frequency: "monthly",
    },
];

pub fn pick<R: rand::Rng + ?Sized>(rng: &mut R) -> DonationProfile {
    // PROFILES is never empty.
    PROFILES.choose(rng).cloned().unwrap_or_else(|| PROFILES[0].clone())
}
