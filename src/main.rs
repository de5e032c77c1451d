use anyhow::Result;
use clap::Parser;
use photo_album::{logger, App, Config};
use std::path::PathBuf;
use std::process::ExitCode;

/// 把一组照片做成相册页面
#[derive(Debug, Parser)]
#[command(name = "photo-album", version, about)]
struct Cli {
    /// 要处理的图片（jpg / png / bmp / gif）
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 同时处理的图片数量
    #[arg(short = 'j', long)]
    max_concurrent: Option<usize>,

    /// 派生图片和 index.html 的输出目录
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// 输出详细日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::from_env()?,
        };

        if let Some(max_concurrent) = self.max_concurrent {
            config.max_concurrent_items = max_concurrent;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        config.verbose_logging |= self.verbose;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    println!("Image Processing will begin now...\n");

    // 初始化并运行应用
    let app = App::initialize(config);
    let stats = app.run(cli.images).await?;
    let report = app.config().report_path();

    println!("=============== END OF PHOTO CONVERSION ===============");
    if stats.failed > 0 {
        match stats.reported_items() {
            0 => eprintln!(
                "{} of {} images failed; {} was not updated by this run.",
                stats.failed,
                stats.total,
                report.display()
            ),
            reported => eprintln!(
                "{} of {} images failed; {} contains images 1 to {}.",
                stats.failed,
                stats.total,
                report.display(),
                reported
            ),
        }
        return Ok(ExitCode::FAILURE);
    }

    println!("Digital Photo Album is Complete!");
    println!(
        "'{}' album and all edited images are in {}.",
        app.config().report_file,
        app.config().output_dir.display()
    );
    Ok(ExitCode::SUCCESS)
}
