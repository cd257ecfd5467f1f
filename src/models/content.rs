use serde::Serialize;

use super::donations::{PaymentMethod, PRESET_AMOUNTS};
use super::payments::Bank;

#[derive(Debug, Clone, Serialize)]
pub struct ImpactStat {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Beneficiary {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub quote: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionValue {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetOption {
    pub amount: u64,
    pub label: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodOption {
    pub id: PaymentMethod,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankOption {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteContent {
    pub title: &'static str,
    pub tagline: &'static str,
    pub impact_stats: Vec<ImpactStat>,
    pub beneficiaries: Vec<Beneficiary>,
    pub mission: Vec<MissionValue>,
    pub stories: Vec<Story>,
    pub presets: Vec<PresetOption>,
    pub payment_methods: Vec<PaymentMethodOption>,
    pub banks: Vec<BankOption>,
}

fn preset_description(amount: u64) -> &'static str {
    match amount {
        2 => "A helping hand",
        50 => "A cup of tea & snack",
        100 => "A nutritious meal",
        _ => "Feed a family",
    }
}

fn method_description(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Qr => "Scan & Pay",
        PaymentMethod::Upi => "GPay, PhonePe, etc.",
        PaymentMethod::Wallet => "Use wallet balance",
        PaymentMethod::Card => "Credit/Debit Card",
        PaymentMethod::NetBanking => "Online banking",
    }
}

impl SiteContent {
    pub fn new(enabled_methods: &[PaymentMethod]) -> Self {
        Self {
            title: "Nobel Hands - Feed the Hungry",
            tagline: "Even ₹2 can make a difference. Join us in ensuring no one sleeps hungry.",
            impact_stats: vec![
                ImpactStat { label: "Meals Served", value: 50_000 },
                ImpactStat { label: "Lives Touched", value: 12_500 },
                ImpactStat { label: "Kind Donors", value: 8_200 },
                ImpactStat { label: "Cities Reached", value: 45 },
            ],
            beneficiaries: vec![
                Beneficiary {
                    title: "Elderly Women",
                    description: "Many elderly women live alone without family support, struggling to afford even basic meals.",
                },
                Beneficiary {
                    title: "Elderly Men",
                    description: "Aging daily wage workers who can no longer find work and have no means to feed themselves.",
                },
                Beneficiary {
                    title: "Street Children",
                    description: "Young children living on streets who often go days without a proper meal.",
                },
                Beneficiary {
                    title: "Underprivileged Families",
                    description: "Families living below the poverty line, struggling to provide one meal a day for their children.",
                },
            ],
            mission: vec![
                MissionValue {
                    title: "Our Mission",
                    description: "To ensure no one in our community goes to bed hungry by making it easy for everyone to contribute, even with the smallest amount.",
                },
                MissionValue {
                    title: "Inclusivity",
                    description: "We believe every donation matters. Whether it's ₹2 or ₹2000, your contribution helps feed someone in need.",
                },
            ],
            stories: vec![
                Story {
                    quote: "I couldn't afford food for days. Thanks to Nobel Hands, I get a warm meal daily. May God bless all the donors.",
                    name: "Kamala Devi, 72 years",
                    location: "Delhi",
                },
                Story {
                    quote: "My children used to sleep hungry. Now they smile because of your donations. Even ₹2 makes a huge difference.",
                    name: "Raju, Father of 3",
                    location: "Mumbai",
                },
                Story {
                    quote: "At my age, finding work is impossible. This organization ensures I don't sleep on an empty stomach. I'm forever grateful.",
                    name: "Ramesh, 68 years",
                    location: "Kolkata",
                },
            ],
            presets: PRESET_AMOUNTS
                .iter()
                .map(|&amount| PresetOption {
                    amount,
                    label: format!("₹{}", amount),
                    description: preset_description(amount),
                })
                .collect(),
            payment_methods: enabled_methods
                .iter()
                .map(|&id| PaymentMethodOption {
                    id,
                    label: id.label(),
                    description: method_description(id),
                })
                .collect(),
            banks: Bank::ALL
                .iter()
                .map(|bank| BankOption {
                    code: bank.code(),
                    name: bank.name(),
                })
                .collect(),
        }
    }
}
