use crate::model::CustomerAttributes;

/// Common slider metadata so bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn as_range(&self) -> std::ops::RangeInclusive<f64> {
        self.min..=self.max
    }
}

pub const AGE_RANGE: SliderRange = SliderRange::new(18.0, 70.0, 1.0);
pub const INCOME_RANGE: SliderRange = SliderRange::new(15.0, 137.0, 1.0);
pub const SPENDING_RANGE: SliderRange = SliderRange::new(1.0, 100.0, 1.0);

/// Values currently entered in the prediction form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerForm {
    pub age: f64,
    pub income: f64,
    pub spending: f64,
    pub is_male: bool,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            age: 35.0,
            income: 50.0,
            spending: 50.0,
            is_male: true,
        }
    }
}

impl CustomerForm {
    pub fn set_age(&mut self, age: f64) {
        self.age = AGE_RANGE.clamp(age);
    }

    pub fn set_income(&mut self, income: f64) {
        self.income = INCOME_RANGE.clamp(income);
    }

    pub fn set_spending(&mut self, spending: f64) {
        self.spending = SPENDING_RANGE.clamp(spending);
    }

    pub fn to_attributes(&self) -> CustomerAttributes {
        CustomerAttributes {
            age: self.age,
            income: self.income,
            spending_score: self.spending,
            is_male: self.is_male,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_setters_clamp_to_slider_bounds() {
        let mut form = CustomerForm::default();
        form.set_age(12.0);
        form.set_income(500.0);
        form.set_spending(42.0);

        assert_eq!(form.age, 18.0);
        assert_eq!(form.income, 137.0);
        assert_eq!(form.spending, 42.0);
    }

    #[test]
    fn test_default_form_converts_to_attributes() {
        let attributes = CustomerForm::default().to_attributes();
        assert_eq!(attributes.age, 35.0);
        assert_eq!(attributes.spending_score, 50.0);
        assert!(attributes.is_male);
    }
}
