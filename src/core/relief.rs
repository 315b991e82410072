use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything a taxpayer can claim relief for.
///
/// Every field is optional when deserialised; missing fields take the defaults
/// below (individual relief claimed, everything else zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ReliefInputs {
    /// Claim the individual relief
    pub individual: bool,
    /// Spouse's annual income; relief applies when it is 4,000 or less
    #[schemars(with = "f64")]
    pub spouse_income: Decimal,
    /// Number of children (relief counted for at most 12)
    pub num_children: u32,
    #[schemars(with = "f64")]
    pub medical_expenses: Decimal,
    #[schemars(with = "f64")]
    pub lifestyle_expenses: Decimal,
    #[schemars(with = "f64")]
    pub education_fees: Decimal,
    #[schemars(with = "f64")]
    pub parental_support: Decimal,
    /// Taxpayer is registered as disabled
    pub disabled: bool,
    pub breastfeeding_equipment: bool,
    pub sports_equipment: bool,
    pub books: bool,
    pub insurance_premium: bool,
}

impl Default for ReliefInputs {
    fn default() -> Self {
        ReliefInputs {
            individual: true,
            spouse_income: Decimal::ZERO,
            num_children: 0,
            medical_expenses: Decimal::ZERO,
            lifestyle_expenses: Decimal::ZERO,
            education_fees: Decimal::ZERO,
            parental_support: Decimal::ZERO,
            disabled: false,
            breastfeeding_equipment: false,
            sports_equipment: false,
            books: false,
            insurance_premium: false,
        }
    }
}

/// A single relief component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReliefKind {
    Individual,
    Spouse,
    Children,
    Medical,
    Lifestyle,
    Education,
    ParentalSupport,
    Disability,
    BreastfeedingEquipment,
    SportsEquipment,
    Books,
    InsurancePremium,
}

pub const MAX_CHILDREN: u32 = 12;
pub const SPOUSE_INCOME_LIMIT: Decimal = dec!(4000);

impl ReliefKind {
    pub const ALL: [ReliefKind; 12] = [
        ReliefKind::Individual,
        ReliefKind::Spouse,
        ReliefKind::Children,
        ReliefKind::Medical,
        ReliefKind::Lifestyle,
        ReliefKind::Education,
        ReliefKind::ParentalSupport,
        ReliefKind::Disability,
        ReliefKind::BreastfeedingEquipment,
        ReliefKind::SportsEquipment,
        ReliefKind::Books,
        ReliefKind::InsurancePremium,
    ];

    /// Most this component can contribute.
    ///
    /// For fixed reliefs this is also the amount granted; children are per child.
    pub fn limit(&self) -> Decimal {
        match self {
            ReliefKind::Individual => dec!(9000),
            ReliefKind::Spouse => dec!(4000),
            ReliefKind::Children => dec!(8000),
            ReliefKind::Medical => dec!(8000),
            ReliefKind::Lifestyle => dec!(2500),
            ReliefKind::Education => dec!(7000),
            ReliefKind::ParentalSupport => dec!(5000),
            ReliefKind::Disability => dec!(6000),
            ReliefKind::BreastfeedingEquipment => dec!(1000),
            ReliefKind::SportsEquipment => dec!(500),
            ReliefKind::Books => dec!(200),
            ReliefKind::InsurancePremium => dec!(3000),
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            ReliefKind::Individual => "Individual",
            ReliefKind::Spouse => "Spouse",
            ReliefKind::Children => "Children",
            ReliefKind::Medical => "Medical expenses",
            ReliefKind::Lifestyle => "Lifestyle",
            ReliefKind::Education => "Education fees",
            ReliefKind::ParentalSupport => "Parental support",
            ReliefKind::Disability => "Disability",
            ReliefKind::BreastfeedingEquipment => "Breastfeeding equipment",
            ReliefKind::SportsEquipment => "Sports equipment",
            ReliefKind::Books => "Books",
            ReliefKind::InsurancePremium => "Insurance premium",
        }
    }

    /// Amount this component contributes for the given inputs
    pub fn amount(&self, inputs: &ReliefInputs) -> Decimal {
        match self {
            ReliefKind::Individual => self.granted_if(inputs.individual),
            ReliefKind::Spouse => self.granted_if(inputs.spouse_income <= SPOUSE_INCOME_LIMIT),
            ReliefKind::Children => {
                Decimal::from(inputs.num_children.min(MAX_CHILDREN)) * self.limit()
            }
            ReliefKind::Medical => self.capped(inputs.medical_expenses),
            ReliefKind::Lifestyle => self.capped(inputs.lifestyle_expenses),
            ReliefKind::Education => self.capped(inputs.education_fees),
            ReliefKind::ParentalSupport => self.capped(inputs.parental_support),
            ReliefKind::Disability => self.granted_if(inputs.disabled),
            ReliefKind::BreastfeedingEquipment => self.granted_if(inputs.breastfeeding_equipment),
            ReliefKind::SportsEquipment => self.granted_if(inputs.sports_equipment),
            ReliefKind::Books => self.granted_if(inputs.books),
            ReliefKind::InsurancePremium => self.granted_if(inputs.insurance_premium),
        }
    }

    fn granted_if(&self, eligible: bool) -> Decimal {
        if eligible {
            self.limit()
        } else {
            Decimal::ZERO
        }
    }

    // negative claims contribute nothing rather than reducing other reliefs
    fn capped(&self, claimed: Decimal) -> Decimal {
        claimed.max(Decimal::ZERO).min(self.limit())
    }
}

impl std::fmt::Display for ReliefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Per-component relief amounts, only including components that contribute
pub fn relief_breakdown(inputs: &ReliefInputs) -> Vec<(ReliefKind, Decimal)> {
    ReliefKind::ALL
        .iter()
        .map(|kind| (*kind, kind.amount(inputs)))
        .filter(|(_, amount)| !amount.is_zero())
        .collect()
}

/// Sum of all relief components, each clamped to its own limit
pub fn calculate_total_relief(inputs: &ReliefInputs) -> Decimal {
    ReliefKind::ALL.iter().map(|kind| kind.amount(inputs)).sum()
}
