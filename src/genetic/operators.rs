//! Crossover and mutation operators on chromosomes

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SnakeError};
use crate::nn::Chromosome;

fn check_lengths(p1: &Chromosome, p2: &Chromosome) -> Result<()> {
    if p1.len() != p2.len() {
        return Err(SnakeError::ShapeMismatch {
            context: "crossover parents",
            expected: p1.len(),
            actual: p2.len(),
        });
    }
    Ok(())
}

/// Simulated binary crossover
///
/// For each gene a spread factor `β` is drawn from the SBX distribution with
/// index `eta`:
///
/// ```text
/// u ~ U[0, 1)
/// β = (2u)^(1/(η+1))             if u ≤ 0.5
/// β = (1/(2(1-u)))^(1/(η+1))     otherwise
/// c1 = ½((1+β)·p1 + (1-β)·p2)
/// c2 = ½((1-β)·p1 + (1+β)·p2)
/// ```
///
/// The children's mean equals the parents' mean gene for gene.
pub fn crossover_simulated_binary<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    eta: f32,
    rng: &mut R,
) -> Result<(Chromosome, Chromosome)> {
    check_lengths(p1, p2)?;
    let exponent = 1.0 / (eta + 1.0);
    let (c1, c2): (Vec<f32>, Vec<f32>) = p1
        .genes()
        .iter()
        .zip(p2.genes())
        .map(|(&a, &b)| {
            let u: f32 = rng.gen_range(0.0..1.0);
            let beta = if u <= 0.5 {
                (2.0 * u).powf(exponent)
            } else {
                (1.0 / (2.0 * (1.0 - u))).powf(exponent)
            };
            (
                0.5 * ((1.0 + beta) * a + (1.0 - beta) * b),
                0.5 * ((1.0 - beta) * a + (1.0 + beta) * b),
            )
        })
        .unzip();
    Ok((Chromosome::new(c1), Chromosome::new(c2)))
}

/// Cut both parents at the same random index and swap the tails
pub fn crossover_single_point<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    rng: &mut R,
) -> Result<(Chromosome, Chromosome)> {
    check_lengths(p1, p2)?;
    if p1.is_empty() {
        return Ok((p1.clone(), p2.clone()));
    }
    let cut = rng.gen_range(0..p1.len());
    let (a, b) = (p1.genes(), p2.genes());
    let c1 = [&a[..cut], &b[cut..]].concat();
    let c2 = [&b[..cut], &a[cut..]].concat();
    Ok((Chromosome::new(c1), Chromosome::new(c2)))
}

/// What happens to a gene picked for mutation
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    /// Add noise drawn from a normal distribution
    Gaussian(Normal<f32>),
    /// Replace with a value from Uniform[-1, 1)
    Uniform,
}

impl Mutation {
    pub fn gaussian(mean: f32, std: f32) -> Result<Self> {
        Normal::new(mean, std)
            .map(Mutation::Gaussian)
            .map_err(|err| SnakeError::InvalidConfig(format!("gaussian mutation: {err}")))
    }
}

/// Mutate each gene independently with probability `rate`
///
/// Returns the number of genes changed.
pub fn mutate<R: Rng>(
    chromosome: &mut Chromosome,
    rate: f64,
    mutation: &Mutation,
    rng: &mut R,
) -> usize {
    let rate = rate.clamp(0.0, 1.0);
    let mut mutated = 0;
    for gene in chromosome.genes_mut() {
        if !rng.gen_bool(rate) {
            continue;
        }
        match mutation {
            Mutation::Gaussian(normal) => *gene += normal.sample(rng),
            Mutation::Uniform => *gene = rng.gen_range(-1.0..1.0),
        }
        mutated += 1;
    }
    mutated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn parents() -> (Chromosome, Chromosome) {
        let p1 = Chromosome::new((0..50).map(|i| i as f32 * 0.1).collect());
        let p2 = Chromosome::new((0..50).map(|i| -(i as f32) * 0.05).collect());
        (p1, p2)
    }

    #[test]
    fn test_sbx_preserves_length_and_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (p1, p2) = parents();
        let (c1, c2) = crossover_simulated_binary(&p1, &p2, 100.0, &mut rng).unwrap();

        assert_eq!(c1.len(), p1.len());
        assert_eq!(c2.len(), p1.len());
        for i in 0..p1.len() {
            let parent_sum = p1.genes()[i] + p2.genes()[i];
            let child_sum = c1.genes()[i] + c2.genes()[i];
            assert!((parent_sum - child_sum).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sbx_large_eta_stays_close() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let p1 = Chromosome::new(vec![1.0; 200]);
        let p2 = Chromosome::new(vec![-1.0; 200]);

        let spread = |eta: f32, rng: &mut ChaCha8Rng| {
            let (c1, _) = crossover_simulated_binary(&p1, &p2, eta, rng).unwrap();
            c1.genes().iter().map(|g| (g - 1.0).abs()).sum::<f32>() / 200.0
        };
        let tight = spread(1000.0, &mut rng);
        let loose = spread(0.5, &mut rng);
        assert!(tight < loose);
        assert!(tight < 0.05);
    }

    #[test]
    fn test_single_point_swaps_tails() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let p1 = Chromosome::new(vec![1.0; 20]);
        let p2 = Chromosome::new(vec![2.0; 20]);
        let (c1, c2) = crossover_single_point(&p1, &p2, &mut rng).unwrap();

        let cut = c1.genes().iter().position(|&g| g == 2.0).unwrap_or(20);
        assert!(c1.genes()[..cut].iter().all(|&g| g == 1.0));
        assert!(c1.genes()[cut..].iter().all(|&g| g == 2.0));
        assert!(c2.genes()[..cut].iter().all(|&g| g == 2.0));
        assert!(c2.genes()[cut..].iter().all(|&g| g == 1.0));
        assert_eq!(c1.len(), 20);
    }

    #[test]
    fn test_crossover_rejects_mismatched_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let p1 = Chromosome::new(vec![0.0; 5]);
        let p2 = Chromosome::new(vec![0.0; 6]);
        assert!(crossover_single_point(&p1, &p2, &mut rng).is_err());
        assert!(crossover_simulated_binary(&p1, &p2, 1.0, &mut rng).is_err());
    }

    #[test]
    fn test_mutation_rates() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mutation = Mutation::gaussian(0.0, 0.2).unwrap();

        let mut untouched = Chromosome::new(vec![0.5; 100]);
        assert_eq!(mutate(&mut untouched, 0.0, &mutation, &mut rng), 0);
        assert!(untouched.genes().iter().all(|&g| g == 0.5));

        let mut everything = Chromosome::new(vec![0.5; 100]);
        assert_eq!(mutate(&mut everything, 1.0, &mutation, &mut rng), 100);
        assert!(everything.genes().iter().any(|&g| g != 0.5));
    }

    #[test]
    fn test_uniform_mutation_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut chromosome = Chromosome::new(vec![10.0; 64]);
        mutate(&mut chromosome, 1.0, &Mutation::Uniform, &mut rng);
        assert!(chromosome.genes().iter().all(|g| (-1.0..1.0).contains(g)));
    }

    #[test]
    fn test_invalid_gaussian() {
        assert!(Mutation::gaussian(0.0, f32::NAN).is_err());
    }
}
