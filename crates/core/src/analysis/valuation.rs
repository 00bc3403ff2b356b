use crate::domain::dashboard::Valuation;

pub fn classify(pe: Option<f64>) -> Valuation {
    match pe {
        Some(p) if p.is_nan() => Valuation::NotAvailable,
        Some(p) if p < 15.0 => Valuation::Undervalued,
        Some(p) if p < 30.0 => Valuation::Fair,
        Some(_) => Valuation::Overvalued,
        None => Valuation::NotAvailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::parse_pe;

    #[test]
    fn buckets_on_boundaries() {
        assert_eq!(classify(Some(-3.0)), Valuation::Undervalued);
        assert_eq!(classify(Some(14.99)), Valuation::Undervalued);
        assert_eq!(classify(Some(15.0)), Valuation::Fair);
        assert_eq!(classify(Some(29.99)), Valuation::Fair);
        assert_eq!(classify(Some(30.0)), Valuation::Overvalued);
        assert_eq!(classify(Some(f64::INFINITY)), Valuation::Overvalued);
        assert_eq!(classify(Some(f64::NAN)), Valuation::NotAvailable);
        assert_eq!(classify(None), Valuation::NotAvailable);
    }

    #[test]
    fn non_numeric_text_is_not_available() {
        assert_eq!(classify(parse_pe("N/A")).label(), "N/A");
        assert_eq!(classify(parse_pe("")).label(), "N/A");
        assert_eq!(classify(parse_pe("22.4")).label(), "Fair");
    }
}
