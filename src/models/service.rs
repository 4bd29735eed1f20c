use serde::Serialize;

/// A bookable service from the clinic's fixed catalogue.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: i64,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub duration: &'static str,
    pub price: &'static str,
}

pub const CATALOGUE: &[Service] = &[
    Service {
        id: 1,
        title: "Individual Therapy",
        description: "One-on-one therapy sessions tailored to your specific needs and goals.",
        icon: "👤",
        duration: "50-60 minutes",
        price: "$150 per session",
    },
    Service {
        id: 2,
        title: "Couples Therapy",
        description: "Specialized therapy for couples to improve communication and strengthen relationships.",
        icon: "💑",
        duration: "80-90 minutes",
        price: "$200 per session",
    },
    Service {
        id: 3,
        title: "Family Therapy",
        description: "Family-focused therapy to address conflicts and improve family dynamics.",
        icon: "👨‍👩‍👧‍👦",
        duration: "80-90 minutes",
        price: "$200 per session",
    },
    Service {
        id: 4,
        title: "Child Therapy",
        description: "Specialized therapy for children and adolescents using age-appropriate techniques.",
        icon: "🧒",
        duration: "45-50 minutes",
        price: "$120 per session",
    },
    Service {
        id: 5,
        title: "Group Therapy",
        description: "Therapeutic groups for shared experiences and peer support.",
        icon: "👥",
        duration: "90 minutes",
        price: "$80 per session",
    },
    Service {
        id: 6,
        title: "Assessment",
        description: "Comprehensive psychological assessments and evaluations.",
        icon: "📋",
        duration: "2-3 hours",
        price: "$300 per assessment",
    },
];

pub fn find_by_id(id: i64) -> Option<&'static Service> {
    CATALOGUE.iter().find(|s| s.id == id)
}
