//! Continuity of a finite operation with respect to a single topology.

use crate::{
    algebra::{operation::Operation, tuples::Tuples},
    error::Result,
    lattices::subset::{BaseSet, Subset},
    topology::finite::Topology,
};

/// Returns the topology if `operation` is continuous with respect to it,
/// `None` otherwise.
///
/// Continuity: for every tuple `(x_1, ..., x_k)` of points of `base` and
/// every open `W` containing `p = f(x_1, ..., x_k)`, there are open sets
/// `U_i ∋ x_i` with `f(U_1, ..., U_k) ⊆ W`.
///
/// Incompatibility is an ordinary result. `Err` only carries a failure of
/// the operation itself.
pub fn is_compatible<O>(base: &BaseSet, topology: &Topology, operation: &O) -> Result<Option<Topology>>
where
    O: Operation + ?Sized,
{
    Ok(check(base, topology, operation)?.then(|| topology.clone()))
}

/// [`is_compatible`] without handing the topology back.
///
/// Stops at the first point tuple with an unwitnessed neighbourhood.
/// Points of `base` outside the topology's own base set have no
/// neighbourhoods, so any open set around their image is unwitnessed.
pub fn check<O>(base: &BaseSet, topology: &Topology, operation: &O) -> Result<bool>
where
    O: Operation + ?Sized,
{
    let points: Vec<usize> = base.points().collect();
    let neighbourhoods: Vec<Vec<Subset>> =
        points.iter().map(|&x| topology.neighbourhoods(x)).collect();

    let mut tuples = Tuples::power(&points, operation.arity());
    while let Some(xs) = tuples.next_tuple() {
        let p = operation.apply_points(xs)?;
        for w in topology.open_sets().filter(|w| w.contains(p)) {
            if !has_witness(xs, w, &neighbourhoods, operation)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Whether some `U_i ∋ x_i` maps into `w`. Neighbourhoods come smallest
/// first, so the minimal ones are tried before anything larger.
fn has_witness<O>(xs: &[usize], w: Subset, neighbourhoods: &[Vec<Subset>], operation: &O) -> Result<bool>
where
    O: Operation + ?Sized,
{
    let axes: Vec<&[Subset]> = xs.iter().map(|&x| neighbourhoods[x].as_slice()).collect();
    let mut candidates = Tuples::new(axes);
    while let Some(us) = candidates.next_tuple() {
        if operation.image_within(us, w)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::{builtin, operation::make_operation},
        lattices::lattice::MeetSemiLattice,
        topology::enumerate::enumerate_topologies,
    };
    use proptest::prelude::*;

    fn base(n: usize) -> BaseSet {
        BaseSet::new(n).unwrap()
    }

    fn topology(n: usize, bits: &[u64]) -> Topology {
        Topology::from_open_sets(base(n), bits.iter().copied().map(Subset::from_bits)).unwrap()
    }

    /// Smallest open set around `x`.
    fn minimal_neighbourhood(t: &Topology, x: usize) -> Subset {
        t.neighbourhoods(x)
            .into_iter()
            .fold(t.base().full(), |acc, u| acc.meet(&u))
    }

    /// Continuity through minimal neighbourhoods: f(N(x_1) × ... × N(x_k)) ⊆ N(f(x)).
    fn reference_check<O: Operation>(x: &BaseSet, t: &Topology, op: &O) -> bool {
        let points: Vec<usize> = x.points().collect();
        let mut tuples = Tuples::power(&points, op.arity());
        while let Some(xs) = tuples.next_tuple() {
            let p = op.apply_points(xs).unwrap();
            let us: Vec<Subset> = xs.iter().map(|&xi| minimal_neighbourhood(t, xi)).collect();
            let image = op.apply_subsets(&us).unwrap();
            if !image.is_subset_of(minimal_neighbourhood(t, p)) {
                return false;
            }
        }
        true
    }

    #[test]
    fn max_on_two_points_accepts_every_topology() {
        let x = base(2);
        let max = builtin::max(2).unwrap();
        for t in enumerate_topologies(2).unwrap().iter() {
            assert_eq!(is_compatible(&x, t, &max).unwrap().as_ref(), Some(t), "{t}");
        }
    }

    #[test]
    fn negation_rejects_sierpinski_spaces() {
        let x = base(2);
        let not = make_operation(|xs: &[usize]| 1 - xs[0], 1).unwrap();

        assert!(check(&x, &Topology::discrete(x), &not).unwrap());
        assert!(check(&x, &Topology::indiscrete(x), &not).unwrap());
        assert_eq!(is_compatible(&x, &topology(2, &[0b00, 0b01, 0b11]), &not), Ok(None));
        assert_eq!(is_compatible(&x, &topology(2, &[0b00, 0b10, 0b11]), &not), Ok(None));
    }

    #[test]
    fn xor_rejects_sierpinski_spaces() {
        let x = base(2);
        let xor = make_operation(|xs: &[usize]| xs[0] ^ xs[1], 2).unwrap();
        assert!(!check(&x, &topology(2, &[0b00, 0b01, 0b11]), &xor).unwrap());
        assert!(!check(&x, &topology(2, &[0b00, 0b10, 0b11]), &xor).unwrap());
    }

    #[test]
    fn constant_operation_is_always_continuous() {
        let x = base(3);
        let constant = make_operation(|_: &[usize]| 2, 3).unwrap();
        for t in enumerate_topologies(3).unwrap().iter() {
            assert!(check(&x, t, &constant).unwrap());
        }
    }

    #[test]
    fn operations_are_usable_as_trait_objects() {
        let x = base(2);
        let op: Box<dyn Operation> = Box::new(builtin::min(2).unwrap());
        assert!(check(&x, &Topology::discrete(x), op.as_ref()).unwrap());
    }

    #[test]
    fn empty_base_set_is_vacuously_compatible() {
        let x = base(0);
        let never = make_operation(|_: &[usize]| -> usize { unreachable!() }, 2).unwrap();
        assert_eq!(
            is_compatible(&x, &Topology::discrete(x), &never).unwrap(),
            Some(Topology::indiscrete(x))
        );
    }

    fn arb_table(n: usize, k: usize) -> impl Strategy<Value = Vec<usize>> {
        // no tuples to evaluate when n = 0
        prop::collection::vec(0..n.max(1), n.pow(k as u32))
    }

    fn table_operation(n: usize, k: usize, table: Vec<usize>) -> impl Operation {
        make_operation(
            move |xs: &[usize]| table[xs.iter().fold(0, |acc, &x| acc * n + x)],
            k,
        )
        .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_discrete_topology_is_always_compatible(
            (n, k, table) in (0usize..=4, 1usize..=3)
                .prop_flat_map(|(n, k)| (Just(n), Just(k), arb_table(n, k)))
        ) {
            let x = base(n);
            let op = table_operation(n, k, table);
            prop_assert!(check(&x, &Topology::discrete(x), &op).unwrap());
            prop_assert!(check(&x, &Topology::indiscrete(x), &op).unwrap());
        }

        #[test]
        fn prop_agrees_with_minimal_neighbourhood_criterion(
            (k, table) in (1usize..=2).prop_flat_map(|k| (Just(k), arb_table(3, k)))
        ) {
            let x = base(3);
            let op = table_operation(3, k, table);
            for t in enumerate_topologies(3).unwrap().iter() {
                prop_assert_eq!(check(&x, t, &op).unwrap(), reference_check(&x, t, &op));
            }
        }
    }
}
