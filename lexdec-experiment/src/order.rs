use lexdec_core::Stimulus;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Seeded when reproducible orderings are wanted, OS entropy otherwise.
pub fn order_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub fn shuffle_stimuli<R: rand::Rng + ?Sized>(stimuli: &mut [Stimulus], rng: &mut R) {
    stimuli.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdec_core::default_word_list;

    #[test]
    fn same_seed_same_order() {
        let mut a = default_word_list();
        let mut b = default_word_list();
        shuffle_stimuli(&mut a, &mut order_rng(Some(7)));
        shuffle_stimuli(&mut b, &mut order_rng(Some(7)));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut list = default_word_list();
        shuffle_stimuli(&mut list, &mut order_rng(Some(42)));
        let mut texts: Vec<_> = list.iter().map(|s| s.text.clone()).collect();
        let mut expected: Vec<_> = default_word_list().into_iter().map(|s| s.text).collect();
        texts.sort();
        expected.sort();
        assert_eq!(texts, expected);
    }
}
