/// Rotation path (spec section 4.10): the sequence of headings the agent
/// sweeps through when turning from one heading to another, choosing the
/// shorter of the clockwise/counter-clockwise arcs.
use crate::types::Heading;

/// The inclusive sequence of headings from `from` to `to`, choosing
/// whichever of the clockwise/counter-clockwise arcs is shorter (ties go
/// to clockwise).
pub fn rotation_path(from: Heading, to: Heading) -> Vec<Heading> {
    let f = from.to_index();
    let t = to.to_index();
    if f == t {
        return vec![from];
    }
    let clockwise = (t - f + 8) % 8;
    let counter_clockwise = (f - t + 8) % 8;

    let step: i32 = if clockwise <= counter_clockwise { 1 } else { -1 };
    let steps = if step == 1 { clockwise } else { counter_clockwise };

    let mut path = Vec::with_capacity(steps as usize + 1);
    let mut cur = f;
    path.push(Heading::from_index(cur));
    for _ in 0..steps {
        cur += step;
        path.push(Heading::from_index(cur));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_heading_is_a_single_element_path() {
        assert_eq!(rotation_path(Heading::N, Heading::N), vec![Heading::N]);
    }

    #[test]
    fn shorter_arc_is_chosen() {
        // N -> SE: clockwise distance 3 (N,NE,E,SE), counter-clockwise 5.
        let path = rotation_path(Heading::N, Heading::SE);
        assert_eq!(path, vec![Heading::N, Heading::NE, Heading::E, Heading::SE]);
    }

    #[test]
    fn counter_clockwise_chosen_when_shorter() {
        // N -> NW: clockwise distance 7, counter-clockwise 1.
        let path = rotation_path(Heading::N, Heading::NW);
        assert_eq!(path, vec![Heading::N, Heading::NW]);
    }

    #[test]
    fn tie_goes_to_clockwise() {
        // N -> S: both arcs length 4. Clockwise: N,NE,E,SE,S.
        let path = rotation_path(Heading::N, Heading::S);
        assert_eq!(path, vec![Heading::N, Heading::NE, Heading::E, Heading::SE, Heading::S]);
    }
}
