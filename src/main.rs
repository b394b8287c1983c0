// ==========================================
// Ready 文件转换管道 - 命令行入口
// ==========================================
// 用法:
//   ready-convert [--config run.json] [--id N] [--no-description]
//   ready-convert --workbook ME2J_export.xlsx [--workbook PartList.xlsx]
//   ready-convert --gen-part-grades --bom-db bom.db [--min-project 123]
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use ready_convert::config::{normalize_project_floor, RunConfig};
use ready_convert::engine::{PartGradeCache, ReadyFileConverter};
use ready_convert::importer::ingest_workbook;
use ready_convert::logging;
use ready_convert::report::RunSummary;
use ready_convert::repository::SqliteBomSource;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};

/// 命令行参数
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    test_id: Option<u32>,
    gen_part_grades: bool,
    min_project: Option<u64>,
    bom_db: Option<String>,
    workbooks: Vec<PathBuf>,
    no_description: bool,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("参数 {} 缺少取值", flag))
            };

            match arg.as_str() {
                "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
                "--id" => {
                    let raw = value("--id")?;
                    cli.test_id = Some(raw.parse().with_context(|| format!("--id 非法: {}", raw))?);
                }
                "--gen-part-grades" | "--gen-parts-grades" => cli.gen_part_grades = true,
                "--min-project" => {
                    let raw = value("--min-project")?;
                    cli.min_project =
                        Some(raw.parse().with_context(|| format!("--min-project 非法: {}", raw))?);
                }
                "--bom-db" => cli.bom_db = Some(value("--bom-db")?),
                "--workbook" => cli.workbooks.push(PathBuf::from(value("--workbook")?)),
                "--no-description" => cli.no_description = true,
                other => bail!("未知参数: {}", other),
            }
        }

        Ok(cli)
    }

    /// 命令行覆写配置文件中的值
    fn apply(&self, config: &mut RunConfig) {
        if self.test_id.is_some() {
            config.test_id = self.test_id;
        }
        if let Some(floor) = self.min_project {
            config.project_floor = floor;
        }
        if self.no_description {
            config.regenerate_description = false;
        }
    }
}

fn main() -> Result<()> {
    logging::init();

    let cli = CliArgs::parse(std::env::args().skip(1))?;
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    cli.apply(&mut config);

    info!("==================================================");
    info!("{} v{}", ready_convert::APP_NAME, ready_convert::VERSION);
    info!("==================================================");

    let mut summary = RunSummary::start(config.test_id);

    if cli.gen_part_grades {
        let db_path = cli
            .bom_db
            .as_deref()
            .ok_or_else(|| anyhow!("--gen-part-grades 需要 --bom-db"))?;
        let floor = normalize_project_floor(config.project_floor);
        info!(floor, db = %db_path, "重建零件材质缓存");

        let source = SqliteBomSource::new(db_path)?;
        let mut cache = PartGradeCache::new();
        let rebuild = cache.rebuild(&source, floor)?;
        cache.save_csv(&config.part_grades_path)?;
        summary.rebuild = Some(rebuild);
    } else {
        let cache = if config.part_grades_path.exists() {
            PartGradeCache::load_csv(&config.part_grades_path)?
        } else {
            warn!(path = %config.part_grades_path.display(), "零件材质缓存不存在,材质列留空");
            PartGradeCache::new()
        };
        info!(entries = cache.len(), "零件材质缓存已加载");

        let mut converter = ReadyFileConverter::new(&config, &cache);
        if cli.workbooks.is_empty() {
            summary.conversions = converter.process_dir()?;
        } else {
            let mut exported = HashSet::new();
            for workbook in &cli.workbooks {
                let report = ingest_workbook(workbook, &mut converter, &mut exported)?;
                summary.adapters.push(report);
            }
        }
    }

    summary.finish();
    let path = summary.write_to(&config.output_dir)?;
    info!(run_id = %summary.run_id, summary = %path.display(), "运行完成");
    Ok(())
}
