use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    #[default]
    Basic,
    Pro,
    Studio,
    Network,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 4] = [
        SubscriptionTier::Basic,
        SubscriptionTier::Pro,
        SubscriptionTier::Studio,
        SubscriptionTier::Network,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "BASIC",
            SubscriptionTier::Pro => "PRO",
            SubscriptionTier::Studio => "STUDIO",
            SubscriptionTier::Network => "NETWORK",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BASIC" | "FREE" => Some(SubscriptionTier::Basic),
            "PRO" => Some(SubscriptionTier::Pro),
            "STUDIO" => Some(SubscriptionTier::Studio),
            "NETWORK" => Some(SubscriptionTier::Network),
            _ => None,
        }
    }

    pub fn permits(self, capability: Capability) -> bool {
        capabilities_for(self).contains(&capability)
    }
}

/// Athlete attributes that are gated by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Name,
    Jersey,
    Position,
    SafeDisplayName,
    Status,
    PhoneticSimplified,
    PhoneticIpa,
    LocalizedNames,
    Bio,
    SocialHandle,
}

// Each tier unlocks its own row plus every row above it.
const CAPABILITY_TABLE: &[(SubscriptionTier, &[Capability])] = &[
    (
        SubscriptionTier::Basic,
        &[Capability::Name, Capability::Jersey, Capability::Position],
    ),
    (
        SubscriptionTier::Pro,
        &[Capability::SafeDisplayName, Capability::Status],
    ),
    (SubscriptionTier::Studio, &[Capability::PhoneticSimplified]),
    (
        SubscriptionTier::Network,
        &[
            Capability::PhoneticIpa,
            Capability::LocalizedNames,
            Capability::Bio,
            Capability::SocialHandle,
        ],
    ),
];

/// Ordered, cumulative capability list for `tier`.
pub fn capabilities_for(tier: SubscriptionTier) -> Vec<Capability> {
    CAPABILITY_TABLE
        .iter()
        .filter(|(t, _)| *t <= tier)
        .flat_map(|(_, caps)| caps.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_cumulative() {
        let basic = capabilities_for(SubscriptionTier::Basic);
        assert_eq!(
            basic,
            vec![Capability::Name, Capability::Jersey, Capability::Position]
        );
        for pair in SubscriptionTier::ALL.windows(2) {
            let lower = capabilities_for(pair[0]);
            let higher = capabilities_for(pair[1]);
            assert!(higher.len() > lower.len());
            assert_eq!(&higher[..lower.len()], lower.as_slice());
        }
    }

    #[test]
    fn phonetics_start_at_studio() {
        assert!(!SubscriptionTier::Pro.permits(Capability::PhoneticSimplified));
        assert!(SubscriptionTier::Studio.permits(Capability::PhoneticSimplified));
        assert!(!SubscriptionTier::Studio.permits(Capability::PhoneticIpa));
        assert!(SubscriptionTier::Network.permits(Capability::PhoneticIpa));
    }

    #[test]
    fn parse_accepts_labels() {
        assert_eq!(SubscriptionTier::parse("network"), Some(SubscriptionTier::Network));
        assert_eq!(SubscriptionTier::parse(" Pro "), Some(SubscriptionTier::Pro));
        assert_eq!(SubscriptionTier::parse("gold"), None);
    }
}
