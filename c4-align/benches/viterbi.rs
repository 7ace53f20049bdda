use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use c4_align::{
    align, align_batch, compile, AffineModelType, ModelBuilder, ModelKind, ModelType, Tracer,
    Viterbi,
};
use c4_core::AlphabetType;
use c4_seq::GeneticCode;

fn random_dna(len: usize, seed: u64) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    // Deterministic pseudo-random for reproducibility
    let mut seq = Vec::with_capacity(len);
    let mut state: u64 = seed;
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        seq.push(bases[((state >> 33) % 4) as usize]);
    }
    seq
}

/// A protein and a gene encoding it with one intron after the first third.
fn gene(codons: usize) -> (Vec<u8>, Vec<u8>) {
    let code = GeneticCode::standard();
    let mut cds = random_dna(codons * 3, 7);
    for codon in cds.chunks_exact_mut(3) {
        if code.is_stop(codon) {
            codon.copy_from_slice(b"TGG");
        }
    }
    let protein = code.translate(&cds);
    let split = (codons / 3) * 3;
    let mut genome = cds[..split].to_vec();
    genome.extend_from_slice(b"GTAAGT");
    genome.extend(random_dna(40, 11));
    genome.extend_from_slice(b"TTTCAG");
    genome.extend_from_slice(&cds[split..]);
    (protein, genome)
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("model");
    for kind in [ModelKind::Protein2Dna, ModelKind::Protein2Genome] {
        let builder = ModelBuilder::new(AlphabetType::Protein, AlphabetType::Dna)
            .with_tracer(Tracer::silent());
        let model_type = ModelType::new(kind, AffineModelType::Local);
        group.bench_function(BenchmarkId::new("build+compile", kind.name()), |b| {
            b.iter(|| compile(&builder.build(black_box(model_type)).unwrap()).unwrap())
        });
    }
    group.finish();
}

fn bench_viterbi(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi");
    group.sample_size(10);

    for kind in [ModelKind::Protein2Dna, ModelKind::Protein2Genome] {
        let model = ModelBuilder::new(AlphabetType::Protein, AlphabetType::Dna)
            .with_tracer(Tracer::silent())
            .build(ModelType::new(kind, AffineModelType::Local))
            .unwrap();
        let compiled = compile(&model).unwrap();
        for &codons in &[10, 30] {
            let (protein, genome) = gene(codons);
            group.bench_with_input(BenchmarkId::new(kind.name(), codons), &codons, |b, _| {
                b.iter(|| align(&compiled, black_box(&protein), black_box(&genome)))
            });
        }
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let model = ModelBuilder::new(AlphabetType::Dna, AlphabetType::Dna)
        .with_tracer(Tracer::silent())
        .build(ModelType::new(ModelKind::Affine, AffineModelType::Global))
        .unwrap();
    let compiled = compile(&model).unwrap();
    let engine = Viterbi::new(&compiled).with_tracer(Tracer::silent());
    let seqs: Vec<(Vec<u8>, Vec<u8>)> = (0..32)
        .map(|i| (random_dna(200, i), random_dna(200, i + 100)))
        .collect();
    let pairs: Vec<(&[u8], &[u8])> = seqs
        .iter()
        .map(|(q, t)| (q.as_slice(), t.as_slice()))
        .collect();

    c.bench_function("batch/affine-200x32", |b| {
        b.iter(|| align_batch(&engine, black_box(&pairs)))
    });
}

criterion_group!(benches, bench_build_and_compile, bench_viterbi, bench_batch);
criterion_main!(benches);
