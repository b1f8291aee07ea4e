use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use vibe_vep::annotate::annotate_variant;
use vibe_vep::cache::{load_cache, CanonicalOverrides};
use vibe_vep::compare::{compare_row, Summary};
use vibe_vep::config::Config;
use vibe_vep::index::ReferenceIndex;
use vibe_vep::io::{maf as maf_io, vcf as vcf_io};
use vibe_vep::pipeline::{CancellationToken, run as pipeline_run};
use vibe_vep::source::{GeneListSource, SourceRegistry};
use vibe_vep::variant::Variant;
use vibe_vep::writer::{
    build_csq_entry, CompareRow, CompareWriter, MafAnnotateWriter, MafRow, RowWriter, TabRow, TabWriter, Vcf2MafRow, Vcf2MafWriter, VcfRow, VcfWriter,
};

#[derive(Parser, Debug)]
#[command(name = "vibe-vep")]
#[command(author = "vibe-vep contributors")]
#[command(version = "0.1.0")]
#[command(about = "Variant effect predictor and MAF annotation comparator", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Gzipped GTF-like gene model
    #[arg(long, global = true)]
    gene_model: Option<PathBuf>,

    /// Gzipped FASTA of coding-transcript sequences
    #[arg(long, global = true)]
    fasta: Option<PathBuf>,

    /// Tab-separated gene-symbol -> transcript-id canonical overrides
    #[arg(long, global = true)]
    overrides: Option<PathBuf>,

    /// Optional curated gene-symbol list (one per line), registered as an
    /// `AnnotationSource` example
    #[arg(long, global = true)]
    gene_list: Option<PathBuf>,

    /// Upstream/downstream flank window in base pairs
    #[arg(long, global = true, default_value_t = vibe_vep::annotate::DEFAULT_FLANK_WINDOW)]
    flank_window: i64,

    /// Number of threads (defaults to number of CPU cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    /// Quiet mode (no progress display)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a VCF or MAF file, emitting tab/VCF/MAF output
    Annotate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Output format: tab, vcf, or maf (maf requires a MAF input, vcf requires a VCF input)
        #[arg(long, default_value = "tab")]
        format: String,
    },
    /// Compare a MAF file's pre-existing annotations against locally computed ones
    Compare {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Comma-separated subset of consequence,hgvsc,hgvsp
        #[arg(long, default_value = "consequence,hgvsc,hgvsp")]
        columns: String,
        /// Emit every row regardless of category visibility
        #[arg(long)]
        all: bool,
    },
    /// Convert a VCF to MAF allele convention with local annotations
    Vcf2Maf {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "SAMPLE")]
        tumor_sample_barcode: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Info).init();

    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to set thread pool size")?;
    }

    let config = Config {
        flank_window: args.flank_window,
        threads: args.threads.unwrap_or(0),
        quiet: args.quiet,
        ..Config::default()
    };
    config.validate()?;

    let gene_model = args.gene_model.as_deref().context("--gene-model is required")?;
    let overrides = load_overrides(args.overrides.as_deref())?;
    let index = load_cache(gene_model, args.fasta.as_deref(), overrides.as_ref()).context("failed to load reference cache")?;

    let mut registry = SourceRegistry::new();
    if let Some(path) = &args.gene_list {
        let genes = read_gene_list(path)?;
        registry.register(Box::new(GeneListSource::new("genelist", genes)));
    }

    match args.command {
        Command::Annotate { input, output, format } => run_annotate(&index, &registry, &input, &output, &format, &config),
        Command::Compare { input, output, columns, all } => run_compare(&index, &input, &output, &columns, all, &config),
        Command::Vcf2Maf {
            input,
            output,
            tumor_sample_barcode,
        } => run_vcf2maf(&index, &input, &output, &tumor_sample_barcode, &config),
    }
}

fn load_overrides(path: Option<&Path>) -> Result<Option<CanonicalOverrides>> {
    match path {
        None => Ok(None),
        Some(p) => {
            let file = File::open(p).with_context(|| format!("failed to open overrides file: {}", p.display()))?;
            Ok(Some(CanonicalOverrides::from_reader(BufReader::new(file))?))
        }
    }
}

fn read_gene_list(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("failed to open gene list: {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .map(|l| l.map(|s| s.trim().to_string()).context("failed to read gene list line"))
        .filter(|l| l.as_ref().map(|s| !s.is_empty()).unwrap_or(true))
        .collect()
}

fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

fn is_maf(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("maf"))
}

fn run_annotate(index: &ReferenceIndex, registry: &SourceRegistry, input: &Path, output: &Path, format: &str, config: &Config) -> Result<()> {
    let out_file = File::create(output).with_context(|| format!("failed to create output file: {}", output.display()))?;
    let mut out = BufWriter::new(out_file);

    if format == "maf" || is_maf(input) {
        let text = std::fs::read_to_string(input).with_context(|| format!("failed to read input file: {}", input.display()))?;
        let mut lines = text.lines().filter(|l| !l.starts_with('#'));
        let header_line = lines.next().context("MAF file has no header line")?;
        let header = maf_io::MafHeader::parse(header_line);
        let original_header: Vec<String> = header_line.split('\t').map(str::to_string).collect();

        let mut writer = MafAnnotateWriter::new(&mut out, original_header);
        writer.write_header()?;

        let rows: Vec<&str> = lines.collect();
        let bar = progress_bar(rows.len() as u64, config.quiet);
        let token = CancellationToken::new();

        // Parsing is cheap and serial (spec.md 5: "parsing is not the
        // bottleneck"); the annotation engine call per row is what fans out
        // across the worker pool, with results reassembled in input order.
        let parsed_rows: Vec<(&str, maf_io::MafRowParse)> = rows
            .iter()
            .filter_map(|line| maf_io::parse_data_line(line, &header).map(|parsed| (*line, parsed)))
            .collect();
        bar.inc((rows.len() - parsed_rows.len()) as u64);

        let results = pipeline_run(parsed_rows, &token, |(line, parsed)| {
            let variant = maf_io::to_vcf_variant(&parsed.allele, 'N');
            let mut annotations = annotate_variant(index, &variant, config.flank_window);
            registry.apply_all(parsed.pre_existing.gene_symbol.as_deref(), &mut annotations);
            let best = vibe_vep::annotate::select_best(&annotations, Some(&parsed.pre_existing)).cloned();
            Ok::<_, String>(MafRow {
                original_fields: line.split('\t').map(str::to_string).collect(),
                best_annotation: best,
                variant_kind: variant.canonicalize().kind,
            })
        })
        .map_err(|e| anyhow::anyhow!("annotation pipeline cancelled: {e}"))?;

        for row in results.into_iter().flatten() {
            writer.write_row(&row)?;
            bar.inc(1);
        }
        bar.finish_and_clear();
        writer.flush()?;
        return Ok(());
    }

    let text = std::fs::read_to_string(input).with_context(|| format!("failed to read input file: {}", input.display()))?;
    let (header_lines, data_lines) = vcf_io::split_header(text.lines());

    if format == "vcf" {
        return run_annotate_vcf(index, registry, &header_lines, &data_lines, &mut out, config);
    }

    let mut writer = TabWriter::new(&mut out);
    writer.write_header()?;

    let token = CancellationToken::new();
    let variants: Vec<Variant> = data_lines
        .iter()
        .filter_map(|l| vcf_io::parse_data_line(l))
        .flat_map(|row| vcf_io::split_multiallelic(&row))
        .collect();

    let bar = progress_bar(variants.len() as u64, config.quiet);
    let results = pipeline_run(variants, &token, |variant| {
        let mut annotations = annotate_variant(index, variant, config.flank_window);
        registry.apply_all(None, &mut annotations);
        let uploaded = format!("{}_{}_{}/{}", variant.chrom, variant.pos, variant.reference, variant.alternate);
        let location = format!("{}:{}", variant.chrom, variant.pos);
        let rows: Vec<TabRow> = annotations.iter().map(|a| TabRow::from_annotation(&uploaded, &location, a)).collect();
        Ok::<_, String>(rows)
    })
    .map_err(|e| anyhow::anyhow!("annotation pipeline cancelled: {e}"))?;

    for rows in results.into_iter().flatten() {
        for row in &rows {
            writer.write_row(row)?;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    writer.flush()?;
    Ok(())
}

/// One coalesced output row keyed by `(CHROM, POS)` (spec.md 6: "Multiple
/// rows for the same (CHROM,POS) coalesce into one output row with merged
/// ALTs"), accumulated across the original input's data rows before any
/// annotation work happens.
struct VcfRowAggregate {
    chrom: String,
    pos: i64,
    id: String,
    reference: String,
    alts: Vec<String>,
    qual: Option<f64>,
    filter: String,
    info_without_csq: String,
    format_and_samples: Option<String>,
    csq_entries: Vec<String>,
}

fn run_annotate_vcf(
    index: &ReferenceIndex,
    registry: &SourceRegistry,
    header_lines: &[String],
    data_lines: &[String],
    out: &mut BufWriter<File>,
    config: &Config,
) -> Result<()> {
    let data_rows: Vec<vcf_io::VcfDataRow> = data_lines.iter().filter_map(|l| vcf_io::parse_data_line(l)).collect();

    // Coalesce rows sharing (CHROM, POS) up front so later CSQ entries land
    // in the right merged row regardless of annotation order.
    let mut aggregates: Vec<VcfRowAggregate> = Vec::new();
    let mut aggregate_index: std::collections::HashMap<(String, i64), usize> = std::collections::HashMap::new();
    // Maps each (row, allele-within-row) pair to the aggregate it landed in,
    // so per-variant annotation results can be routed back after the fact.
    let mut variant_targets: Vec<(usize, Variant)> = Vec::new();
    let mut variant_aggregate: Vec<usize> = Vec::new();

    for row in &data_rows {
        let key = (vibe_vep::index::normalize_chrom(&row.chrom), row.pos);
        let agg_idx = *aggregate_index.entry(key.clone()).or_insert_with(|| {
            aggregates.push(VcfRowAggregate {
                chrom: row.chrom.clone(),
                pos: row.pos,
                id: row.id.clone(),
                reference: row.reference.clone(),
                alts: Vec::new(),
                qual: row.qual,
                filter: row.filter.clone(),
                info_without_csq: vibe_vep::writer::strip_csq(&row.info),
                format_and_samples: row.format_and_samples.clone(),
                csq_entries: Vec::new(),
            });
            aggregates.len() - 1
        });
        for variant in vcf_io::split_multiallelic(row) {
            aggregates[agg_idx].alts.push(variant.alternate.clone());
            variant_targets.push((agg_idx, variant));
            variant_aggregate.push(agg_idx);
        }
    }

    let aux_order = registry.column_order();
    let aux_field_names: Vec<String> = aux_order.iter().map(|(s, c)| format!("{s}_{c}")).collect();
    let aux_field_refs: Vec<&str> = aux_field_names.iter().map(String::as_str).collect();
    let mut writer = VcfWriter::new(out, header_lines.to_vec(), &aux_field_refs);
    writer.write_header()?;

    let token = CancellationToken::new();
    let bar = progress_bar(variant_targets.len() as u64, config.quiet);
    let results = pipeline_run(variant_targets, &token, |(_, variant)| {
        let mut annotations = annotate_variant(index, variant, config.flank_window);
        registry.apply_all(None, &mut annotations);
        let entries: Vec<String> = annotations
            .iter()
            .map(|a| {
                let aux_values: Vec<String> = aux_order.iter().map(|(s, c)| a.extra.get(&(s.clone(), c.clone())).cloned().unwrap_or_default()).collect();
                build_csq_entry(a, &aux_values)
            })
            .collect();
        Ok::<_, String>(entries)
    })
    .map_err(|e| anyhow::anyhow!("annotation pipeline cancelled: {e}"))?;

    for (agg_idx, entries) in variant_aggregate.into_iter().zip(results.into_iter()) {
        if let Some(entries) = entries {
            aggregates[agg_idx].csq_entries.extend(entries);
        }
        bar.inc(1);
    }

    for agg in &aggregates {
        writer.write_row(&VcfRow {
            chrom: agg.chrom.clone(),
            pos: agg.pos,
            id: agg.id.clone(),
            reference: agg.reference.clone(),
            alt: agg.alts.join(","),
            qual: agg.qual,
            filter: agg.filter.clone(),
            info_without_csq: agg.info_without_csq.clone(),
            format_and_samples: agg.format_and_samples.clone(),
            csq_entries: agg.csq_entries.clone(),
        })?;
    }
    bar.finish_and_clear();
    writer.flush()?;
    Ok(())
}

fn run_compare(index: &ReferenceIndex, input: &Path, output: &Path, columns_spec: &str, show_all: bool, config: &Config) -> Result<()> {
    let columns = Config::parse_columns(columns_spec)?;
    let text = std::fs::read_to_string(input).with_context(|| format!("failed to read input file: {}", input.display()))?;
    let mut lines = text.lines().filter(|l| !l.starts_with('#'));
    let header_line = lines.next().context("MAF file has no header line")?;
    let header = maf_io::MafHeader::parse(header_line);
    let rows: Vec<&str> = lines.collect();

    let out_file = File::create(output).with_context(|| format!("failed to create output file: {}", output.display()))?;
    let mut out = BufWriter::new(out_file);
    let mut writer = CompareWriter::new(&mut out, columns, show_all);
    writer.write_header()?;

    let mut summary = Summary::default();
    let bar = progress_bar(rows.len() as u64, config.quiet);
    let token = CancellationToken::new();

    let parsed_rows: Vec<maf_io::MafRowParse> = rows
        .iter()
        .filter_map(|line| maf_io::parse_data_line(line, &header))
        .collect();
    bar.inc((rows.len() - parsed_rows.len()) as u64);

    // Each row's annotate-and-categorize is independent of every other row,
    // so it fans out across the worker pool; `compare_row` returning `None`
    // (no transcript match at all) degrades that one row rather than
    // aborting the batch (spec.md 5.4).
    let results = pipeline_run(parsed_rows, &token, |parsed| {
        let variant = maf_io::to_vcf_variant(&parsed.allele, 'N');
        let annotations = annotate_variant(index, &variant, config.flank_window);
        let row_categories = compare_row(&parsed.pre_existing, &annotations, &columns);
        let best = vibe_vep::annotate::select_best(&annotations, Some(&parsed.pre_existing));
        let compare_row = row_categories.clone().map(|categories| CompareRow {
            variant: format!("{}:{}:{}:{}", variant.chrom, variant.pos, variant.reference, variant.alternate),
            gene: parsed.pre_existing.gene_symbol.clone().unwrap_or_default(),
            maf_consequence: parsed.pre_existing.consequence.clone(),
            vep_consequence: best.map(|a| a.consequence.clone()),
            maf_hgvsc: parsed.pre_existing.hgvsc_without_prefix().map(str::to_string),
            vep_hgvsc: best.map(|a| a.hgvsc.clone()),
            maf_hgvsp: parsed.pre_existing.hgvsp.clone(),
            vep_hgvsp: best.map(|a| a.hgvsp.clone()),
            categories: categories.clone(),
        });
        Ok::<_, String>((row_categories, compare_row))
    })
    .map_err(|e| anyhow::anyhow!("comparison pipeline cancelled: {e}"))?;

    for result in results {
        match result {
            Some((Some(categories), Some(row))) => {
                summary.record(&categories);
                writer.write_row(&row)?;
            }
            Some((None, _)) | None => summary.record_skip(),
            Some((Some(_), None)) => unreachable!("compare_row produced categories without a row"),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    writer.flush()?;

    if !config.quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn run_vcf2maf(index: &ReferenceIndex, input: &Path, output: &Path, tumor_sample_barcode: &str, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(input).with_context(|| format!("failed to read input file: {}", input.display()))?;
    let (_header, data_lines) = vcf_io::split_header(text.lines());

    let out_file = File::create(output).with_context(|| format!("failed to create output file: {}", output.display()))?;
    let mut out = BufWriter::new(out_file);
    let mut writer = Vcf2MafWriter::new(&mut out);
    writer.write_header()?;

    let variants: Vec<Variant> = data_lines
        .iter()
        .filter_map(|l| vcf_io::parse_data_line(l))
        .flat_map(|row| vcf_io::split_multiallelic(&row))
        .collect();

    let token = CancellationToken::new();
    let bar = progress_bar(variants.len() as u64, config.quiet);
    let results = pipeline_run(variants, &token, |variant| {
        let annotations = annotate_variant(index, variant, config.flank_window);
        let best = vibe_vep::annotate::select_best(&annotations, None).cloned();
        Ok::<_, String>(Vcf2MafRow {
            allele: variant.to_maf_convention(),
            tumor_sample_barcode: tumor_sample_barcode.to_string(),
            best_annotation: best,
        })
    })
    .map_err(|e| anyhow::anyhow!("annotation pipeline cancelled: {e}"))?;

    for row in results.into_iter().flatten() {
        writer.write_row(&row)?;
        bar.inc(1);
    }
    bar.finish_and_clear();
    writer.flush()?;
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("============================================================");
    println!("Comparison summary");
    println!("============================================================");
    println!("Rows compared:                {}", summary.rows_compared);
    println!("Rows skipped (no transcript): {}", summary.rows_skipped_no_transcript_match);
    for (label, histogram) in [("consequence", &summary.consequence), ("hgvsc", &summary.hgvsc), ("hgvsp", &summary.hgvsp)] {
        println!("\n{label}:");
        for (category, count) in Summary::visible_counts(histogram) {
            println!("  {category:<24} {count}");
        }
    }
}
