//! Marketing copy for the landing page.

use serde::Serialize;

pub const HERO_TITLE: &str = "Create Professional";
pub const HERO_HIGHLIGHT: &str = "Indian Language Voiceovers";
pub const HERO_SUBTITLE: &str = "Transform your text into natural-sounding voiceovers in 15+ Indian languages. Perfect for content creators, businesses, and educators.";

/// Language pills shown before the "+N more" badge.
pub const HERO_LANGUAGE_PILLS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "15+ Indian Languages",
        description: "Support for all major Indian languages with authentic accents and pronunciations",
    },
    Feature {
        title: "AI-Powered Voices",
        description: "Natural-sounding male and female voices powered by advanced AI technology",
    },
    Feature {
        title: "Lightning Fast",
        description: "Generate professional voiceovers in seconds, not hours",
    },
    Feature {
        title: "Instant Download",
        description: "Download your voiceovers as high-quality MP3 files instantly",
    },
];

pub const HOW_IT_WORKS: &[Feature] = &[
    Feature {
        title: "Enter Your Script",
        description: "Type or paste your text in any Indian language",
    },
    Feature {
        title: "Choose Language & Voice",
        description: "Select from 15+ languages and voice options",
    },
    Feature {
        title: "Customize Settings",
        description: "Adjust speed, tone, and other voice parameters",
    },
    Feature {
        title: "Generate & Download",
        description: "Get your professional voiceover as MP3",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub number: &'static str,
    pub label: &'static str,
}

pub const STATS: &[Stat] = &[
    Stat {
        number: "50,000+",
        label: "Voiceovers Generated",
    },
    Stat {
        number: "15+",
        label: "Indian Languages",
    },
    Stat {
        number: "10,000+",
        label: "Happy Users",
    },
    Stat {
        number: "99.9%",
        label: "Uptime",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub name: &'static str,
    pub role: &'static str,
    pub content: &'static str,
    pub rating: u8,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "Priya Sharma",
        role: "Content Creator",
        content: "PariVaani has revolutionized my content creation process. The Hindi voices are incredibly natural!",
        rating: 5,
    },
    Testimonial {
        name: "Rajesh Kumar",
        role: "Small Business Owner",
        content: "Perfect for creating promotional videos in regional languages. Saved me thousands on voice actors.",
        rating: 5,
    },
    Testimonial {
        name: "Anita Patel",
        role: "Educator",
        content: "The Gujarati voice quality is outstanding. My students love the educational content I create.",
        rating: 5,
    },
];

/// Short plan cards on the landing page; the full list lives on `/pricing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanTeaser {
    pub name: &'static str,
    pub price: &'static str,
    pub period: &'static str,
    pub features: &'static [&'static str],
    pub cta: &'static str,
    pub popular: bool,
}

pub const PLAN_TEASERS: &[PlanTeaser] = &[
    PlanTeaser {
        name: "Free",
        price: "₹0",
        period: "/month",
        features: &[
            "5 voiceovers/month",
            "Basic voices",
            "30 seconds max",
            "Standard quality",
        ],
        cta: "Get Started",
        popular: false,
    },
    PlanTeaser {
        name: "Creator",
        price: "₹299",
        period: "/month",
        features: &[
            "50 voiceovers/month",
            "Premium voices",
            "5 minutes max",
            "HD quality",
            "Priority support",
        ],
        cta: "Start Free Trial",
        popular: true,
    },
    PlanTeaser {
        name: "Business",
        price: "₹799",
        period: "/month",
        features: &[
            "Unlimited voiceovers",
            "All premium voices",
            "No time limit",
            "Commercial license",
            "API access",
        ],
        cta: "Contact Sales",
        popular: false,
    },
];

pub const FOOTER_TAGLINE: &str = "Professional AI-powered voiceover generator for Indian languages.";
