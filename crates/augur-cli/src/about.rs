//! Product overview shown by `augur about`.

pub const TITLE: &str = "Augur - Fair Value Classification Model";

pub const POSITIONING: &str = "\
Transforming Financial reporting & Fair Value classification process leveraging the power of \
Data, Artificial Intelligence & Machine learning.

Augur predicts fair value classification levels using machine learning, reinforced by risk \
observability checks and analytical review for reliable, explainable outcomes.";

/// `(heading, [(benefit, detail)])` in display order.
pub const BENEFITS: &[(&str, &[(&str, &str)])] = &[
    (
        "Simpler",
        &[(
            "Reduce Operational complexity",
            "Streamlines the IFRS13 Fair value classification process significantly reducing manual work involved.",
        )],
    ),
    (
        "Better",
        &[
            (
                "Real time Financial insights",
                "Predict fair value classification in real-time, enabling Finance to inform business strategy.",
            ),
            (
                "Leverage our Data super-power",
                "Use our historical data to predict fair value classification.",
            ),
            (
                "Early warning of risk concentration",
                "Enables identification of potential risk concentrations.",
            ),
        ],
    ),
    (
        "More balanced",
        &[
            (
                "Control Focus",
                "Built-in Guardrails for IFRS13 compliance with risk observability grounding before external & regulatory reporting.",
            ),
            (
                "Scalable",
                "Scalable model to absorb regulatory updates ensuring transparency and trust in financial reporting.",
            ),
        ],
    ),
];

pub fn render() -> String {
    let mut out = format!("=== {TITLE} ===\n\n{POSITIONING}\n\n");
    out.push_str("Our solution will transform the IFRS13 Fair Value Classification process to be:\n");
    for (heading, items) in BENEFITS {
        out.push_str(&format!("\n{heading}\n"));
        for (benefit, detail) in *items {
            out.push_str(&format!("  - {benefit}: {detail}\n"));
        }
    }
    out
}
