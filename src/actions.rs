use crate::effects::Effect;
use crate::model::AlgorithmId;
use crate::store::Store;

/// Actions that can be dispatched to modify the dashboard state
#[derive(Debug, Clone)]
pub enum Action {
    /// Switch the clustering model being explored
    SelectAlgorithm { algorithm: AlgorithmId },

    // Prediction form
    /// Set the customer's age
    SetAge { age: f64 },
    /// Set the annual income in k$
    SetIncome { income: f64 },
    /// Set the spending score
    SetSpending { spending: f64 },
    /// Toggle the gender checkbox
    SetMale { is_male: bool },
    /// Ask the backend which cluster the form values fall into
    SubmitPrediction,

    /// Hide the error banner
    DismissError,
}

/// Apply a single action to the store. Selection changes are picked up
/// by the orchestrator through its subscription, so only a prediction
/// request yields an effect here.
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        Action::SelectAlgorithm { algorithm } => {
            store.set_algorithm(algorithm);
            vec![]
        }
        Action::SetAge { age } => {
            store.form.set_age(age);
            vec![]
        }
        Action::SetIncome { income } => {
            store.form.set_income(income);
            vec![]
        }
        Action::SetSpending { spending } => {
            store.form.set_spending(spending);
            vec![]
        }
        Action::SetMale { is_male } => {
            store.form.is_male = is_male;
            vec![]
        }
        Action::SubmitPrediction => vec![Effect::Predict {
            input: store.form.to_attributes(),
            algorithm: store.algorithm(),
        }],
        Action::DismissError => {
            store.dismiss_error();
            vec![]
        }
    }
}
