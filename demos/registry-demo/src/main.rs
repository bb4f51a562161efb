//! # 组件注册表示例应用
//!
//! 演示如何组装注册表、注册自定义组件、按能力解析组件并通过文件服务写入文件

use anyhow::Context;
use clap::Parser;
use component_macros::Component;
use di_abstractions::{Component, ComponentContainer, ServiceProviderExt, SiteSlot};
use file_components::{FileAccessOptions, OpenMode};
use infrastructure_composition::{ComponentRegistry, LoggingConfig, RegistryBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "registry-demo")]
#[command(about = "Lorn 组件注册表示例应用")]
struct Args {
    /// 配置文件路径（.toml 或 .json）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出目录，覆盖配置文件中的 files.base_path
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// 写入的文件名
    #[arg(long, default_value = "greetings.txt")]
    file_name: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,
}

/// 问候能力
trait Greeter: Send + Sync {
    fn greet(&self, who: &str) -> String;
}

#[derive(Debug, Component)]
#[component(provides(dyn Greeter))]
struct PoliteGreeter {
    site: SiteSlot,
}

impl Greeter for PoliteGreeter {
    fn greet(&self, who: &str) -> String {
        format!("你好，{}！", who)
    }
}

#[derive(Debug, Component)]
#[component(provides(dyn Greeter), release = "farewell")]
struct CasualGreeter {
    #[site]
    slot: SiteSlot,
}

impl CasualGreeter {
    fn farewell(&self) {
        info!("CasualGreeter 已释放");
    }
}

impl Greeter for CasualGreeter {
    fn greet(&self, who: &str) -> String {
        format!("hi {}", who)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = if args.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    }
    .with_filter(args.log_level.clone());

    let registry = build_registry(&args, logging)?;

    demonstrate_resolution(&registry)?;
    demonstrate_file_access(&registry, &args.file_name)?;

    registry.shutdown();
    info!("应用已关闭");
    Ok(())
}

/// 构建注册表
fn build_registry(args: &Args, logging: LoggingConfig) -> anyhow::Result<ComponentRegistry> {
    let mut builder = RegistryBuilder::new().with_logging(logging);

    if let Some(config) = &args.config {
        builder = match config.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => builder.add_config_toml(config)?,
            Some("json") => builder.add_config_json(config)?,
            _ => anyhow::bail!("不支持的配置文件格式: {}", config.display()),
        };
    }

    builder = builder.add_config_env_vars("REGISTRY");

    if let Some(dir) = &args.output_dir {
        builder = builder.with_file_options(
            FileAccessOptions::new(dir).with_create_missing_directories(true),
        );
    }

    builder.build().context("构建组件注册表失败")
}

/// 演示按能力解析组件
fn demonstrate_resolution(registry: &ComponentRegistry) -> anyhow::Result<()> {
    let container = registry.container();

    let polite = Arc::new(PoliteGreeter {
        site: SiteSlot::new(),
    });
    let casual = Arc::new(CasualGreeter {
        slot: SiteSlot::new(),
    });
    container.add_named(polite.clone(), Some("polite"))?;
    container.add_named(casual.clone(), Some("casual"))?;

    // 第一个满足能力的组件胜出
    let greeter = container.require_service::<dyn Greeter>()?;
    info!("{}", greeter.greet("世界"));

    if let Err(e) = container.add_named(
        Arc::new(PoliteGreeter {
            site: SiteSlot::new(),
        }),
        Some("CASUAL"),
    ) {
        warn!("名称冲突被拒绝: {}", e);
    }

    container.remove(polite.as_ref());
    let greeter = container.require_service::<dyn Greeter>()?;
    info!("移除 polite 之后: {}", greeter.greet("世界"));

    if let Some(site) = casual.site() {
        site.set_name(Some("friendly"))?;
        info!("casual 已重命名为 {:?}", site.name());
    }

    for site in container.sites() {
        info!("站点 {} -> {} ({:?})", site.id, site.type_name, site.name);
    }
    Ok(())
}

/// 演示文件服务
fn demonstrate_file_access(registry: &ComponentRegistry, file_name: &str) -> anyhow::Result<()> {
    let handler = registry.file_handler()?;
    let greeter = registry.container().require_service::<dyn Greeter>()?;

    handler.open(file_name, OpenMode::Append)?;
    handler.write(&greeter.greet("文件"))?;
    handler.write("\n")?;
    handler.close()?;

    let path = handler.directory().resolve(file_name);
    info!("已写入 {}", path.display());
    Ok(())
}
