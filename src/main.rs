use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use rsfindu::{ConfigManager, RuleLibrary, RuleLoader, Scanner, TimeoutPolicy, UrlParser};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "rsfindu", version, about = "并发 Web 指纹识别")]
struct Cli {
    /// 目标URL，多个用逗号分隔：[http|https]://www.example.com[,http://www.example.org]
    #[arg(short, long)]
    url: Option<String>,

    /// 从文件读取目标URL（每行一个）
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// 每个URL的规则工人数
    #[arg(short, long, default_value_t = 20)]
    thread: usize,

    /// 列出全部规则
    #[arg(short, long)]
    show: bool,

    /// 自定义规则文件（JSON），默认使用内置规则
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// 规则匹配超时（秒）
    #[arg(long, default_value_t = 3)]
    timeout: u64,

    /// HTTP请求超时（秒）
    #[arg(long, default_value_t = 10)]
    http_timeout: u64,

    /// 自定义 User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// 超时从匹配开始计算，而不是距离上一个事件
    #[arg(long)]
    deadline: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.url.is_none() && cli.file.is_none() && !cli.show {
        Cli::command().print_help()?;
        return Ok(());
    }

    let rules = match &cli.rules {
        Some(path) => RuleLoader::from_path(path).await.context("load rule file")?,
        None => RuleLoader::load_default().context("load embedded rules")?,
    };

    if cli.show {
        show_rules(&rules);
    }

    let urls = match (&cli.url, &cli.file) {
        (Some(list), _) => UrlParser::parse_list(list).context("parse urls")?,
        (None, Some(path)) => UrlParser::from_file(path)
            .await
            .with_context(|| format!("read urls from {}", path.display()))?,
        (None, None) => return Ok(()),
    };
    if urls.is_empty() {
        warn!("没有可扫描的URL");
        return Ok(());
    }
    info!("[+] 已解析{}个URL", urls.len());

    let policy = if cli.deadline { TimeoutPolicy::Deadline } else { TimeoutPolicy::Inactivity };
    let mut builder = ConfigManager::custom()
        .worker_count(cli.thread)
        .inactivity_timeout(Duration::from_secs(cli.timeout))
        .http_timeout(Duration::from_secs(cli.http_timeout))
        .timeout_policy(policy);
    if let Some(agent) = cli.user_agent {
        builder = builder.user_agent(agent);
    }
    let config = builder.build().context("invalid scan options")?;

    let scanner = Scanner::with_defaults(Arc::new(rules), config).context("build scanner")?;
    let result = scanner.scan_urls(&urls).await?;

    // 按URL排序输出
    let ordered: BTreeMap<_, _> = result.into_iter().collect();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ordered)?);
    } else {
        for (url, names) in &ordered {
            println!("{}: {:?}", url, names);
        }
    }

    Ok(())
}

fn show_rules(rules: &RuleLibrary) {
    println!("共{}条规则：", rules.len());
    for (idx, name) in rules.names().iter().enumerate() {
        println!("{:>4}. {}", idx + 1, name);
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级；-v 时默认 debug
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
