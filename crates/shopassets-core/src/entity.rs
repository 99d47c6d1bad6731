use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Entity kinds that own image assets.
///
/// This is a closed set: the path segment of every constructed asset URL is one
/// of these values, and unknown strings are rejected at the integration
/// boundary via `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Product,
    Category,
    Banner,
    Review,
    Customer,
    Notification,
    EcommerceBrand,
    DeliveryAgent,
    Chat,
    CategoryBanner,
    FlashSale,
    PaymentGateway,
    Order,
}

impl EntityKind {
    /// Path segment used in tenant-scoped asset paths.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Category => "category",
            EntityKind::Banner => "banner",
            EntityKind::Review => "review",
            EntityKind::Customer => "customer",
            EntityKind::Notification => "notification",
            EntityKind::EcommerceBrand => "ecommerce-brand",
            EntityKind::DeliveryAgent => "delivery-agent",
            EntityKind::Chat => "chat",
            EntityKind::CategoryBanner => "category-banner",
            EntityKind::FlashSale => "flash-sale",
            EntityKind::PaymentGateway => "payment-gateway",
            EntityKind::Order => "order",
        }
    }

    /// One-letter prefix for public-ID addressed paths. Only kinds that can be
    /// addressed by a stable public identifier have one.
    pub fn public_id_prefix(&self) -> Option<&'static str> {
        match self {
            EntityKind::Product => Some("p"),
            EntityKind::Category => Some("c"),
            _ => None,
        }
    }

    /// Whether this kind participates in public-ID addressing at all.
    pub fn supports_public_id(&self) -> bool {
        self.public_id_prefix().is_some()
    }
}

impl FromStr for EntityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "product" => Ok(EntityKind::Product),
            "category" => Ok(EntityKind::Category),
            "banner" => Ok(EntityKind::Banner),
            "review" => Ok(EntityKind::Review),
            "customer" => Ok(EntityKind::Customer),
            "notification" => Ok(EntityKind::Notification),
            "ecommerce-brand" => Ok(EntityKind::EcommerceBrand),
            "delivery-agent" => Ok(EntityKind::DeliveryAgent),
            "chat" => Ok(EntityKind::Chat),
            "category-banner" => Ok(EntityKind::CategoryBanner),
            "flash-sale" => Ok(EntityKind::FlashSale),
            "payment-gateway" => Ok(EntityKind::PaymentGateway),
            "order" => Ok(EntityKind::Order),
            _ => Err(anyhow::anyhow!("Invalid entity kind: {}", s)),
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_kinds() {
        let kinds = [
            EntityKind::Product,
            EntityKind::Category,
            EntityKind::Banner,
            EntityKind::Review,
            EntityKind::Customer,
            EntityKind::Notification,
            EntityKind::EcommerceBrand,
            EntityKind::DeliveryAgent,
            EntityKind::Chat,
            EntityKind::CategoryBanner,
            EntityKind::FlashSale,
            EntityKind::PaymentGateway,
            EntityKind::Order,
        ];
        for kind in kinds {
            let parsed: EntityKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("warehouse".parse::<EntityKind>().is_err());
        assert!("".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_public_id_prefix_set() {
        assert_eq!(EntityKind::Product.public_id_prefix(), Some("p"));
        assert_eq!(EntityKind::Category.public_id_prefix(), Some("c"));
        assert_eq!(EntityKind::Banner.public_id_prefix(), None);
        assert!(!EntityKind::Order.supports_public_id());
    }
}
