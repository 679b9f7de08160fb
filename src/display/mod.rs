use std::fmt::{self, Display, Formatter};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;
use num_traits::{Float, FromPrimitive};

use crate::hypothesis::DifferenceResult;

impl<F> DifferenceResult<F>
where
    F: Float + Display + FromPrimitive,
{
    pub fn display(&self) -> String {
        let c = |x: f64| F::from_f64(x).expect("failed to convert constant to F");
        let p_05 = c(0.05);
        let p_10 = c(0.10);

        let mut title_table = Table::new();
        title_table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .add_row(vec![
                Cell::new(format!(
                    "Block Bootstrap Group Difference ({} replicates)",
                    self.n_reps()
                ))
                .set_alignment(CellAlignment::Center),
            ]);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Location").set_alignment(CellAlignment::Center),
                Cell::new("Observed Δ").set_alignment(CellAlignment::Center),
                Cell::new("p(Δ > 0)").set_alignment(CellAlignment::Center),
                Cell::new("p(Δ ≤ 0)").set_alignment(CellAlignment::Center),
                Cell::new("Interpretation").set_alignment(CellAlignment::Center),
            ]);

        for v in 0..self.locations() {
            // One-sided evidence in either direction.
            let p_min = if self.p_gt[v] < self.p_leq[v] {
                self.p_gt[v]
            } else {
                self.p_leq[v]
            };
            let interpretation = if p_min < p_05 {
                if self.p_leq[v] < self.p_gt[v] {
                    "🔴 A > B"
                } else {
                    "🔴 A < B"
                }
            } else if p_min < p_10 {
                "🟠 Weak evidence of a difference"
            } else {
                "🟢 No evidence of a difference"
            };

            table.add_row(vec![
                Cell::new(v.to_string()).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:+.4}", self.observed[v]))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", self.p_gt[v])).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", self.p_leq[v])).set_alignment(CellAlignment::Right),
                Cell::new(interpretation).set_alignment(CellAlignment::Left),
            ]);
        }

        format!("{}\n{}", title_table, table)
    }
}

impl<F> Display for DifferenceResult<F>
where
    F: Float + Display + FromPrimitive,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::SpatialMean;
    use crate::{Bundle, Series, difference_bootstrap};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn renders_one_row_per_location() {
        let rows: Vec<Vec<f64>> = (0..2)
            .map(|r| (0..40).map(|t| (t as f64 * 0.3 + r as f64).sin()).collect())
            .collect();
        let a = Bundle::new(vec![Series::from_rows(rows.clone()).unwrap()]).unwrap();
        let b = Bundle::new(vec![Series::from_rows(rows).unwrap()]).unwrap();

        let out = difference_bootstrap(&a, &b, &SpatialMean, 4, 50, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let rendered = out.display();
        assert!(rendered.contains("p(Δ > 0)"));
        assert!(rendered.contains("50 replicates"));
    }
}
