use std::io::{self, Write};

use prquad::cli::{CliArgs, OutputFormatter};
use prquad::commands::{parse_points, split_command_line, Command, Reply};
use prquad::{PRQuadTree, PrquadConfig, Result};
use tracing::{info, warn, Level};

fn main() -> Result<()> {
    let args = CliArgs::parse_args();

    // 验证参数
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // 生成默认配置文件
    if args.generate_config {
        let config = PrquadConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        return Ok(());
    }

    // 加载配置
    let mut config = PrquadConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(resolution) = args.resolution {
        config.tree.resolution = resolution;
    }
    if let Some(bucket_size) = args.bucket_size {
        config.tree.bucket_size = bucket_size;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;

    let mut tree = config.build_tree()?;
    info!(
        "created PR-quadtree with k={} b={}",
        tree.resolution(),
        tree.bucket_size()
    );

    // 预加载点文件
    if let Some(ref path) = args.points {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read points file '{}': {}", path.display(), e))?;
        let points = parse_points(&content)?;
        let total = points.len();
        let inserted = tree.extend(points)?;
        info!("loaded {} points from {}", inserted, path.display());
        if args.should_run_interactive() {
            println!(
                "{}",
                OutputFormatter::format_loaded_message(inserted, total, &path.display().to_string())
            );
        }
    }

    if args.should_run_interactive() {
        // 交互模式
        config.print_summary();
        run_interactive_mode(&mut tree)?;
    } else {
        // 直接命令模式
        run_command_mode(&mut tree, &args.command)?;
    }

    Ok(())
}

fn run_command_mode(tree: &mut PRQuadTree, command: &[String]) -> Result<()> {
    let command = Command::parse(command)?;
    let reply = command.execute(tree)?;
    println!("{}", OutputFormatter::format_reply(&reply));
    Ok(())
}

fn run_interactive_mode(tree: &mut PRQuadTree) -> Result<()> {
    println!("prquad-cli interactive mode");
    println!("Type 'HELP' for available commands, 'QUIT' to exit.");
    println!();

    // 创建标准输入读取器
    let stdin = io::stdin();

    loop {
        // 显示提示符
        print!(
            "{}",
            OutputFormatter::format_prompt(tree.resolution(), tree.bucket_size())
        );
        io::stdout().flush()?;

        // 读取用户输入
        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!();
                break;
            }
            Ok(_) => {
                let parts = split_command_line(input.trim());
                if parts.is_empty() {
                    continue;
                }

                let result = Command::parse(&parts).and_then(|command| command.execute(tree));
                match result {
                    Ok(reply) => {
                        println!("{}", OutputFormatter::format_reply(&reply));
                        if reply == Reply::Quit {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("command failed: {}", e);
                        println!("{}", OutputFormatter::format_error(&e.to_string()));
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// 初始化日志系统
///
/// 标准输出留给命令结果，stdout 模式的日志写到 stderr
fn init_logging(config: &prquad::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| format!("Failed to open log file '{}': {}", log_file.display(), e))?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}
