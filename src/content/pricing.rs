//! Subscription plans and the pricing FAQ.

use super::Faq;
use serde::Serialize;

/// A subscription plan as shown on the pricing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Display price, e.g. "₹299" or "Custom".
    pub price: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub limitations: &'static [&'static str],
    pub cta: &'static str,
    pub popular: bool,
}

impl Plan {
    /// Whether the price is negotiated rather than listed.
    pub fn is_custom(&self) -> bool {
        self.price == "Custom"
    }
}

/// Available plans, cheapest first.
pub const PLANS: &[Plan] = &[
    Plan {
        id: "free",
        name: "Free",
        price: "₹0",
        period: "forever",
        description: "Perfect for trying out PariVaani",
        features: &[
            "5 voiceovers per month",
            "Up to 500 characters per voiceover",
            "3 Indian languages",
            "2 voice options",
            "Standard quality audio",
            "MP3 download",
        ],
        limitations: &[
            "Limited language support",
            "Basic voice options",
            "Standard audio quality",
        ],
        cta: "Get Started Free",
        popular: false,
    },
    Plan {
        id: "creator",
        name: "Creator",
        price: "₹299",
        period: "per month",
        description: "Ideal for content creators and educators",
        features: &[
            "50 voiceovers per month",
            "Up to 2,000 characters per voiceover",
            "All 15+ Indian languages",
            "8 premium voice options",
            "High-quality audio (320kbps)",
            "Priority processing",
            "Voice speed control",
            "Email support",
        ],
        limitations: &[],
        cta: "Start Creator Plan",
        popular: true,
    },
    Plan {
        id: "business",
        name: "Business",
        price: "₹799",
        period: "per month",
        description: "Perfect for businesses and agencies",
        features: &[
            "200 voiceovers per month",
            "Up to 5,000 characters per voiceover",
            "All 15+ Indian languages",
            "12 premium voice options",
            "Studio-quality audio (320kbps)",
            "Instant processing",
            "Advanced voice controls",
            "Custom voice training (coming soon)",
            "Priority support",
            "Commercial usage rights",
        ],
        limitations: &[],
        cta: "Start Business Plan",
        popular: false,
    },
    Plan {
        id: "enterprise",
        name: "Enterprise",
        price: "Custom",
        period: "pricing",
        description: "For large organizations with custom needs",
        features: &[
            "Unlimited voiceovers",
            "Unlimited characters",
            "All current and future languages",
            "Custom voice cloning",
            "API access",
            "White-label solution",
            "Dedicated account manager",
            "24/7 phone support",
            "Custom integrations",
            "SLA guarantee",
        ],
        limitations: &[],
        cta: "Contact Sales",
        popular: false,
    },
];

/// Look up a plan by id (case-insensitive).
pub fn find_plan(id: &str) -> Option<&'static Plan> {
    let id = id.trim();
    PLANS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

pub const PRICING_FAQS: &[Faq] = &[
    Faq {
        question: "Can I change my plan anytime?",
        answer: "Yes, you can upgrade or downgrade your plan at any time. Changes take effect immediately, and we'll prorate the billing accordingly.",
    },
    Faq {
        question: "What languages are supported?",
        answer: "We support 15+ Indian languages including Hindi, Tamil, Telugu, Gujarati, Bengali, Marathi, Kannada, Malayalam, Punjabi, Odia, Assamese, and Urdu.",
    },
    Faq {
        question: "Can I use the voiceovers commercially?",
        answer: "Yes, all paid plans include commercial usage rights. You can use the generated voiceovers in your business projects, YouTube videos, podcasts, and more.",
    },
    Faq {
        question: "What audio quality do you provide?",
        answer: "Free plan provides standard quality (128kbps), while paid plans offer high-quality (320kbps) and studio-quality audio with crystal clear pronunciation.",
    },
    Faq {
        question: "Is there a free trial?",
        answer: "Yes, our Free plan is available forever with 5 voiceovers per month. You can also try any paid plan with a 7-day free trial.",
    },
    Faq {
        question: "How accurate is the pronunciation?",
        answer: "Our AI models are specifically trained on Indian languages and accents, achieving 99%+ accuracy in pronunciation and natural speech patterns.",
    },
];

/// Everything `GET /api/pricing` returns.
#[derive(Debug, Clone, Serialize)]
pub struct PricingPage {
    pub plans: &'static [Plan],
    pub faqs: &'static [Faq],
}

impl PricingPage {
    pub fn build() -> Self {
        Self {
            plans: PLANS,
            faqs: PRICING_FAQS,
        }
    }
}
