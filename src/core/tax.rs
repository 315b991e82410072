use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Progressive bracket that a chargeable (net) income falls into.
///
/// Brackets are closed on their upper bound: exactly 50,000 is still `Lower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bracket {
    /// Nothing left to tax after reliefs
    Exempt,
    /// Up to 50,000 at 10%
    Lower,
    /// 50,000 to 100,000 at 20%
    Middle,
    /// Above 100,000 at 30%
    Upper,
}

impl Bracket {
    pub fn for_net_income(net: Decimal) -> Self {
        if net <= Decimal::ZERO {
            Bracket::Exempt
        } else if net <= dec!(50000) {
            Bracket::Lower
        } else if net <= dec!(100000) {
            Bracket::Middle
        } else {
            Bracket::Upper
        }
    }

    /// Lowest net income charged at this bracket's rate (exclusive)
    pub fn floor(&self) -> Decimal {
        match self {
            Bracket::Exempt | Bracket::Lower => Decimal::ZERO,
            Bracket::Middle => dec!(50000),
            Bracket::Upper => dec!(100000),
        }
    }

    /// Tax already due on all income up to `floor`
    pub fn base_tax(&self) -> Decimal {
        match self {
            Bracket::Exempt | Bracket::Lower => Decimal::ZERO,
            Bracket::Middle => dec!(5000),
            Bracket::Upper => dec!(15000),
        }
    }

    /// Marginal rate applied above `floor`
    pub fn rate(&self) -> Decimal {
        match self {
            Bracket::Exempt => Decimal::ZERO,
            Bracket::Lower => dec!(0.10),
            Bracket::Middle => dec!(0.20),
            Bracket::Upper => dec!(0.30),
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Bracket::Exempt => "exempt",
            Bracket::Lower => "10% (up to 50,000)",
            Bracket::Middle => "20% (50,000 - 100,000)",
            Bracket::Upper => "30% (above 100,000)",
        }
    }
}

impl std::fmt::Display for Bracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Tax payable on `income` after deducting `relief`.
///
/// Total over all inputs: a relief larger than the income simply yields zero.
pub fn calculate_tax(income: Decimal, relief: Decimal) -> Decimal {
    let net = net_income(income, relief);
    let bracket = Bracket::for_net_income(net);
    match bracket {
        Bracket::Exempt => Decimal::ZERO,
        _ => bracket.base_tax() + (net - bracket.floor()) * bracket.rate(),
    }
}

/// Income less relief, clamped to the representable range
fn net_income(income: Decimal, relief: Decimal) -> Decimal {
    income.saturating_sub(relief)
}

/// Result of a single tax calculation, kept together for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxAssessment {
    pub income: Decimal,
    pub total_relief: Decimal,
    pub net_income: Decimal,
    pub bracket: Bracket,
    pub tax_payable: Decimal,
}

impl TaxAssessment {
    pub fn new(income: Decimal, total_relief: Decimal) -> Self {
        let net = net_income(income, total_relief);
        TaxAssessment {
            income,
            total_relief,
            net_income: net,
            bracket: Bracket::for_net_income(net),
            tax_payable: calculate_tax(income, total_relief),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tax_when_relief_covers_income() {
        assert_eq!(calculate_tax(dec!(0), dec!(0)), dec!(0));
        assert_eq!(calculate_tax(dec!(20000), dec!(20000)), dec!(0));
        assert_eq!(calculate_tax(dec!(10000), dec!(35000)), dec!(0));
    }

    #[test]
    fn negative_income_is_exempt() {
        assert_eq!(calculate_tax(dec!(-5000), dec!(0)), dec!(0));
    }

    #[test]
    fn extreme_inputs_do_not_overflow() {
        assert_eq!(calculate_tax(Decimal::MIN, Decimal::MAX), dec!(0));
        assert_eq!(calculate_tax(Decimal::MIN, dec!(1)), dec!(0));

        let tax = calculate_tax(Decimal::MAX, Decimal::MIN);
        assert!(tax > dec!(15000));
        assert!(tax < Decimal::MAX);

        let assessment = TaxAssessment::new(Decimal::MIN, Decimal::MAX);
        assert_eq!(assessment.net_income, Decimal::MIN);
        assert_eq!(assessment.bracket, Bracket::Exempt);
    }

    #[test]
    fn lower_bracket() {
        assert_eq!(calculate_tax(dec!(0.01), dec!(0)), dec!(0.001));
        assert_eq!(calculate_tax(dec!(30000), dec!(0)), dec!(3000));
        assert_eq!(calculate_tax(dec!(50000), dec!(0)), dec!(5000));
    }

    #[test]
    fn middle_bracket() {
        assert_eq!(calculate_tax(dec!(50000.01), dec!(0)), dec!(5000.002));
        assert_eq!(calculate_tax(dec!(75000), dec!(0)), dec!(10000));
        assert_eq!(calculate_tax(dec!(100000), dec!(0)), dec!(15000));
    }

    #[test]
    fn upper_bracket() {
        assert_eq!(calculate_tax(dec!(100000.01), dec!(0)), dec!(15000.003));
        assert_eq!(calculate_tax(dec!(200000), dec!(0)), dec!(45000));
    }

    #[test]
    fn brackets_meet_at_boundaries() {
        // each formula agrees with its neighbour where they meet
        let lower_at_50k = dec!(50000) * dec!(0.10);
        let middle_at_50k = dec!(5000) + (dec!(50000) - dec!(50000)) * dec!(0.20);
        assert_eq!(lower_at_50k, middle_at_50k);

        let middle_at_100k = dec!(5000) + (dec!(100000) - dec!(50000)) * dec!(0.20);
        let upper_at_100k = dec!(15000) + (dec!(100000) - dec!(100000)) * dec!(0.30);
        assert_eq!(middle_at_100k, upper_at_100k);
    }

    #[test]
    fn tax_never_decreases_with_income() {
        let mut previous = Decimal::ZERO;
        let mut income = dec!(-1000);
        while income <= dec!(160000) {
            let tax = calculate_tax(income, Decimal::ZERO);
            assert!(tax >= previous, "tax dropped at income {income}");
            previous = tax;
            income += dec!(250.25);
        }
    }

    #[test]
    fn bracket_classification_at_boundaries() {
        assert_eq!(Bracket::for_net_income(dec!(0)), Bracket::Exempt);
        assert_eq!(Bracket::for_net_income(dec!(0.01)), Bracket::Lower);
        assert_eq!(Bracket::for_net_income(dec!(50000)), Bracket::Lower);
        assert_eq!(Bracket::for_net_income(dec!(50000.01)), Bracket::Middle);
        assert_eq!(Bracket::for_net_income(dec!(100000)), Bracket::Middle);
        assert_eq!(Bracket::for_net_income(dec!(100000.01)), Bracket::Upper);
    }

    #[test]
    fn relief_reduces_net_income() {
        assert_eq!(calculate_tax(dec!(60000), dec!(10000)), dec!(5000));
        assert_eq!(calculate_tax(dec!(120000), dec!(0)), dec!(21000));
    }

    #[test]
    fn assessment_carries_net_and_bracket() {
        let assessment = TaxAssessment::new(dec!(120000), dec!(13000));
        assert_eq!(assessment.net_income, dec!(107000));
        assert_eq!(assessment.bracket, Bracket::Upper);
        assert_eq!(assessment.tax_payable, dec!(17100));
    }
}
