//! Color inference shared by the Recolor and FilterColor color witnesses

use super::{Conflict, Spec, StateMap, WitnessError, WitnessRequest};
use crate::grid::{Cell, PartialImage, MAX_COLOR};
use crate::semantics::Value;

/// Colors that could have produced every nonzero signal in `output`
///
/// Exact colors must agree; "not k" cells remove k; "any nonzero" cells only
/// count as a signal. An output without any signal has no defined color.
pub fn admissible_colors(output: &PartialImage) -> Result<Vec<u8>, Conflict> {
    let mut exact: Option<u8> = None;
    let mut excluded = [false; MAX_COLOR as usize + 1];
    let mut signal = false;

    for &cell in output.cells() {
        match cell {
            Cell::Exact(0) => {}
            Cell::Exact(value) => {
                signal = true;
                match exact {
                    None => exact = Some(value),
                    Some(first) if first != value => {
                        return Err(Conflict::ConflictingColors { first, second: value });
                    }
                    Some(_) => {}
                }
            }
            Cell::AnyNonzero => signal = true,
            Cell::AnyExcept(k) => {
                signal = true;
                excluded[k as usize] = true;
            }
        }
    }

    if !signal {
        return Err(Conflict::NoColorSignal);
    }

    let colors: Vec<u8> = match exact {
        Some(color) => vec![color],
        None => (1..=MAX_COLOR).collect(),
    }
    .into_iter()
    .filter(|&color| !excluded[color as usize])
    .collect();

    if colors.is_empty() {
        return Err(Conflict::ExhaustedColors);
    }
    Ok(colors)
}

/// Run [`admissible_colors`] over every state, stopping at the first conflict
pub fn witness_colors(request: &WitnessRequest) -> Result<StateMap<Vec<u8>>, WitnessError> {
    request
        .outputs
        .iter()
        .map(|(&state, output)| {
            admissible_colors(output)
                .map(|colors| (state, colors))
                .map_err(|conflict| WitnessError::unsat(state, conflict))
        })
        .collect()
}

/// [`witness_colors`] packaged as a disjunctive spec
pub fn color_spec(request: &WitnessRequest) -> Result<Spec, WitnessError> {
    let colors = witness_colors(request)?;
    Ok(Spec::Disjunctive(
        colors
            .into_iter()
            .map(|(state, colors)| (state, colors.into_iter().map(Value::Color).collect()))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::StateId;

    fn partial(codes: &[i32]) -> PartialImage {
        PartialImage::from_codes(0, 0, codes.len(), 1, codes).unwrap()
    }

    #[test]
    fn test_single_exact_color() {
        let output = PartialImage::from_codes(0, 0, 2, 2, &[0, 3, 0, 0]).unwrap();
        assert_eq!(admissible_colors(&output).unwrap(), vec![3]);
    }

    #[test]
    fn test_two_colors_conflict() {
        let err = admissible_colors(&partial(&[2, 0, 5])).unwrap_err();
        assert_eq!(err, Conflict::ConflictingColors { first: 2, second: 5 });
    }

    #[test]
    fn test_all_zero_has_no_signal() {
        assert_eq!(admissible_colors(&partial(&[0, 0])).unwrap_err(), Conflict::NoColorSignal);
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(admissible_colors(&partial(&[0, 10])).unwrap(), (1..=9).collect::<Vec<_>>());
        assert_eq!(admissible_colors(&partial(&[-4])).unwrap(), vec![1, 2, 3, 5, 6, 7, 8, 9]);
        assert_eq!(admissible_colors(&partial(&[-4, -6, 0])).unwrap(), vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_wildcards_narrow_exact() {
        assert_eq!(admissible_colors(&partial(&[10, 7])).unwrap(), vec![7]);
        assert_eq!(admissible_colors(&partial(&[-2, 7])).unwrap(), vec![7]);
        assert_eq!(admissible_colors(&partial(&[-7, 7])).unwrap_err(), Conflict::ExhaustedColors);
    }

    #[test]
    fn test_first_failing_state_is_reported() {
        let request = WitnessRequest::new(StateMap::from([
            (StateId(0), partial(&[1, 0])),
            (StateId(1), partial(&[1, 2])),
            (StateId(2), partial(&[0, 0])),
        ]));
        let err = witness_colors(&request).unwrap_err();
        assert_eq!(
            err,
            WitnessError::Unsatisfiable {
                state: StateId(1),
                conflict: Conflict::ConflictingColors { first: 1, second: 2 },
            }
        );
    }
}
