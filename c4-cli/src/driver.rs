//! Loading, model selection and parallel alignment for the `c4` binary.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;

use c4_align::{
    compile, AlignmentPath, CompiledRecurrence, ModelBuilder, ModelParams, Tracer, Viterbi,
};
use c4_core::{AlphabetType, C4Error, Sequence};
use c4_seq::{read_fasta, select_chunk, SeqRecord};

use crate::Cli;

/// Read every file, then keep the requested chunk.
fn load(
    paths: &[PathBuf],
    alphabet: AlphabetType,
    chunk_id: usize,
    chunk_total: usize,
) -> Result<Vec<SeqRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let mut batch = read_fasta(path, alphabet)
            .with_context(|| format!("reading {}", path.display()))?;
        records.append(&mut batch);
    }
    let records = select_chunk(records, chunk_id, chunk_total)?;
    Ok(records)
}

/// One compiled model per (query, target) alphabet pair present in the job.
/// Pairs the model kind cannot handle map to `None`.
fn compile_models(
    cli: &Cli,
    queries: &[SeqRecord],
    targets: &[SeqRecord],
) -> Result<BTreeMap<(AlphabetType, AlphabetType), Option<CompiledRecurrence>>> {
    let mut models = BTreeMap::new();
    for q in queries {
        for t in targets {
            let key = (q.alphabet(), t.alphabet());
            if models.contains_key(&key) {
                continue;
            }
            let params = ModelParams {
                genetic_code: cli.geneticcode,
                ..ModelParams::for_alphabets(q.alphabet(), t.alphabet())
            };
            let builder = ModelBuilder::new(q.alphabet(), t.alphabet()).with_params(params);
            let compiled = match builder.build(cli.model) {
                Ok(model) => Some(compile(&model)?),
                Err(err @ C4Error::AlphabetMismatch { .. }) => {
                    log::warn!("{err}; skipping {} x {} pairs", q.alphabet(), t.alphabet());
                    None
                }
                Err(err) => return Err(err.into()),
            };
            models.insert(key, compiled);
        }
    }
    Ok(models)
}

fn write_path(out: &mut impl Write, q: &SeqRecord, t: &SeqRecord, p: &AlignmentPath) -> Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        p.model_name,
        q.id(),
        p.query_start,
        p.query_end,
        t.id(),
        p.target_start,
        p.target_end,
        p.score,
        p.segment_string()
    )?;
    Ok(())
}

/// Align every query against every target and write one line per
/// alignment. Returns the number of alignments written.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<usize> {
    let queries = load(&cli.query, cli.querytype, cli.querychunkid, cli.querychunktotal)?;
    let targets = load(
        &cli.target,
        cli.targettype,
        cli.targetchunkid,
        cli.targetchunktotal,
    )?;
    log::info!(
        "Aligning {} queries against {} targets with {}",
        queries.len(),
        targets.len(),
        cli.model
    );

    let models = compile_models(cli, &queries, &targets)?;
    let pairs: Vec<(&SeqRecord, &SeqRecord)> = queries
        .iter()
        .flat_map(|q| targets.iter().map(move |t| (q, t)))
        .collect();

    let results: Vec<Option<AlignmentPath>> = pairs
        .par_iter()
        .map(|&(q, t)| -> Result<Option<AlignmentPath>> {
            let key = (q.alphabet(), t.alphabet());
            let Some(Some(compiled)) = models.get(&key) else {
                return Ok(None);
            };
            let engine = Viterbi::new(compiled)
                .with_threshold(cli.score)
                .with_max_cells(cli.maxcells)
                .with_tracer(Tracer::global());
            match engine.align_sequences(q, t) {
                Ok(path) => Ok(path),
                Err(err @ (C4Error::AlphabetMismatch { .. } | C4Error::InvalidInput(_))) => {
                    log::warn!("{} vs {}: {err}; skipped", q.id(), t.id());
                    Ok(None)
                }
                Err(err) => Err(err).with_context(|| format!("aligning {} vs {}", q.id(), t.id())),
            }
        })
        .collect::<Result<_>>()?;

    let mut reported = 0;
    for ((q, t), path) in pairs.iter().zip(&results) {
        if let Some(path) = path {
            write_path(out, q, t, path)?;
            reported += 1;
        }
    }
    Ok(reported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write as _;

    fn fasta(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("c4").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn protein2genome_run() {
        let q = fasta(">mf\nMF\n>mk\nMK\n");
        let t = fasta(">gene\nATGGTCCCCACCCCCTCCCAGTTT\n");
        let args = cli(&[
            "-q",
            q.path().to_str().unwrap(),
            "-t",
            t.path().to_str().unwrap(),
            "-m",
            "protein2genome:local",
        ]);
        let mut out = Vec::new();
        let n = run(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(n, text.lines().count());
        let first = text.lines().next().unwrap();
        let fields: Vec<&str> = first.split('\t').collect();
        assert_eq!(fields[0], "protein2genome:local");
        assert_eq!(fields[1], "mf");
        assert_eq!(fields[4], "gene");
    }

    #[test]
    fn chunks_and_threshold() {
        let q = fasta(">a\nACGTACGT\n>b\nTTTTTTTT\n");
        let t = fasta(">x\nACGTACGT\n");
        let base = [
            "-q",
            q.path().to_str().unwrap(),
            "-t",
            t.path().to_str().unwrap(),
            "-m",
            "affine:global",
        ];

        let mut args: Vec<&str> = base.to_vec();
        args.extend(["--querychunkid", "1", "--querychunktotal", "2"]);
        let mut out = Vec::new();
        assert_eq!(run(&cli(&args), &mut out).unwrap(), 1);
        assert!(String::from_utf8(out).unwrap().contains("\ta\t"));

        let mut args: Vec<&str> = base.to_vec();
        args.extend(["-s", "30"]);
        let mut out = Vec::new();
        // only a vs x reaches 40
        assert_eq!(run(&cli(&args), &mut out).unwrap(), 1);
    }

    #[test]
    fn mismatched_pairs_are_skipped() {
        let q = fasta(">p\nMKVLAAGW\n>d\nACGTACGT\n");
        let t = fasta(">g\nATGAAAGTG\n");
        let args = cli(&[
            "-q",
            q.path().to_str().unwrap(),
            "-t",
            t.path().to_str().unwrap(),
            "-m",
            "protein2dna",
        ]);
        let mut out = Vec::new();
        let n = run(&args, &mut out).unwrap();
        assert_eq!(n, 1);
        assert!(String::from_utf8(out).unwrap().contains("\tp\t"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = cli(&["-q", "/nonexistent/q.fa", "-t", "/nonexistent/t.fa"]);
        let mut out = Vec::new();
        assert!(run(&args, &mut out).is_err());
    }

    #[test]
    fn bad_model_name_rejected_by_parser() {
        let parsed = Cli::try_parse_from(["c4", "-q", "a.fa", "-t", "b.fa", "-m", "blastx"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn genetic_code_flag() {
        let parsed = cli(&["-q", "a.fa", "-t", "b.fa", "--geneticcode", "2"]);
        assert_eq!(parsed.geneticcode, c4_seq::GeneticCodeId::VertebrateMitochondrial);
        let parsed = Cli::try_parse_from(["c4", "-q", "a.fa", "-t", "b.fa", "--geneticcode", "4"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn oversized_pairs_are_skipped() {
        let q = fasta(">short\nACGT\n>long\nACGTACGTACGTACGTACGTACGTACGTACGT\n");
        let t = fasta(">x\nACGTACGT\n");
        let args = cli(&[
            "-q",
            q.path().to_str().unwrap(),
            "-t",
            t.path().to_str().unwrap(),
            "-m",
            "affine:local",
            "--maxcells",
            "400",
        ]);
        let mut out = Vec::new();
        let n = run(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(n, 1);
        assert!(text.contains("\tshort\t"));
        assert!(!text.contains("\tlong\t"));
    }
}
