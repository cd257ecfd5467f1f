use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "🙏 Namaste! I'm Nobelica AI, your intelligent companion at Nobel Hands. I'm here to help you understand how your donation can fight hunger and make a meaningful impact. Ask me anything!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn from_user(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            sender: Sender::User,
            options: None,
            timestamp: Utc::now(),
        }
    }

    pub fn from_ai(reply: &ChatReply) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: reply.text.to_string(),
            sender: Sender::Ai,
            options: (!reply.options.is_empty()).then(|| reply.options.to_vec()),
            timestamp: Utc::now(),
        }
    }

    pub fn welcome() -> Self {
        Self::from_ai(&ChatReply {
            topic: Topic::Greeting,
            text: WELCOME_MESSAGE,
            options: &["How do I donate?", "Who do you help?", "Is my donation safe?"],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Greeting,
    Donation,
    Wallet,
    Impact,
    Beneficiaries,
    Safety,
    Tax,
    Process,
    MinimumAmount,
    Thanks,
    Identity,
    Fallback,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub topic: Topic,
    pub text: &'static str,
    pub options: &'static [&'static str],
}

struct Rule {
    keywords: &'static [&'static str],
    reply: ChatReply,
}

// Order matters: the first rule with a matching keyword wins.
static RULES: [Rule; 11] = [
    Rule {
        keywords: &["hello", "hi", "hey", "namaste"],
        reply: ChatReply {
            topic: Topic::Greeting,
            text: "Hello! I'm Nobelica AI, your intelligent assistant at Nobel Hands. I'm here to help you make a difference in fighting hunger. How can I assist you today?",
            options: &["How do I donate?", "What impact does my donation make?"],
        },
    },
    Rule {
        keywords: &["donate", "donation"],
        reply: ChatReply {
            topic: Topic::Donation,
            text: "You can donate starting from just ₹2! Even small amounts make a huge difference. Would you like me to suggest a donation amount based on the impact you want to create?",
            options: &["Suggest an amount", "What is the minimum?"],
        },
    },
    Rule {
        keywords: &["wallet", "charity wallet"],
        reply: ChatReply {
            topic: Topic::Wallet,
            text: "Our Charity Wallet lets you store funds and donate instantly without entering payment details each time. It's convenient and helps you donate quickly when you feel inspired!",
            options: &[],
        },
    },
    Rule {
        keywords: &["impact", "help", "difference"],
        reply: ChatReply {
            topic: Topic::Impact,
            text: "Every donation creates real impact! ₹2 provides a helping hand, ₹50 can buy tea and snacks, ₹100 provides a nutritious meal, and ₹500 can feed an entire family. What matters most is your kindness!",
            options: &["₹50", "₹100", "₹500"],
        },
    },
    Rule {
        keywords: &["who", "beneficiary", "feed"],
        reply: ChatReply {
            topic: Topic::Beneficiaries,
            text: "We help elderly beggars, homeless individuals, street children, and families who can't afford meals. 100% of your donation goes directly to feeding those in need.",
            options: &[],
        },
    },
    Rule {
        keywords: &["safe", "secure", "trust"],
        reply: ChatReply {
            topic: Topic::Safety,
            text: "Your donations are 100% secure. We use encrypted payment gateways and 100% of your contribution goes directly to feeding the hungry. We're transparent about where every rupee goes!",
            options: &[],
        },
    },
    Rule {
        keywords: &["tax", "receipt", "80g"],
        reply: ChatReply {
            topic: Topic::Tax,
            text: "Yes! All donations are eligible for tax exemption under Section 80G. You'll receive a donation receipt via email that you can use for tax filing.",
            options: &[],
        },
    },
    Rule {
        keywords: &["how", "work", "process"],
        reply: ChatReply {
            topic: Topic::Process,
            text: "It's simple! Choose a donation amount, select your payment method (we now have a Charity Wallet option!), and complete the payment. We immediately use your funds to provide meals to those in need.",
            options: &["Donate now"],
        },
    },
    Rule {
        keywords: &["minimum", "₹2", "rs 2"],
        reply: ChatReply {
            topic: Topic::MinimumAmount,
            text: "Yes, you can donate as little as ₹2! We believe every contribution matters. Small donations from many kind hearts can create massive impact together.",
            options: &[],
        },
    },
    Rule {
        keywords: &["thank"],
        reply: ChatReply {
            topic: Topic::Thanks,
            text: "Thank YOU for your compassion and generosity! Together, we're making a real difference in fighting hunger. 🙏",
            options: &[],
        },
    },
    Rule {
        keywords: &["name", "who are you", "nobelica"],
        reply: ChatReply {
            topic: Topic::Identity,
            text: "I'm Nobelica AI! I'm an intelligent assistant created to help donors like you make the most meaningful impact in fighting hunger through Nobel Hands. I can answer questions, provide donation guidance, and help you understand the real-world impact of your generosity.",
            options: &[],
        },
    },
];

static FALLBACK: ChatReply = ChatReply {
    topic: Topic::Fallback,
    text: "That's a great question! I can help you with information about donations, our charity wallet, the impact of your contribution, who we help, and how Nobel Hands works. What would you like to know?",
    options: &["How do I donate?", "Who do you help?", "Is my donation safe?"],
};

/// Picks the canned reply for `message`.
pub fn respond(message: &str) -> &'static ChatReply {
    let message = message.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| message.contains(k)))
        .map(|rule| &rule.reply)
        .unwrap_or(&FALLBACK)
}
