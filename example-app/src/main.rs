//! # 示例应用程序
//!
//! 演示如何使用 `#[component]` 声明组件、通过配置启动容器并解析依赖

use clap::Parser;
use di_impl::Engine;
use infrastructure_composition::{Bootstrapper, ContainerSettings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod services;

use services::{Clock, FixedClock, Greeter, RequestId};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn DI 示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志过滤指令，覆盖配置文件
    #[arg(long)]
    log_filter: Option<String>,

    /// 使用固定时钟替换扫描到的系统时钟
    #[arg(long)]
    fixed_clock: Option<u64>,

    /// 要问候的名字
    #[arg(default_value = "world")]
    name: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => ContainerSettings::load(Some(path.as_path()))?,
        None => ContainerSettings::from_env()?,
    };
    if settings.scan_packages.is_empty() {
        settings.scan_packages.push(module_path!().to_string());
    }
    if let Some(filter) = args.log_filter {
        settings.logging.filter = filter;
    }

    let fixed_clock = args.fixed_clock;
    let engine = Bootstrapper::new(settings)
        .with_logging(true)
        .configure(|builder| match fixed_clock {
            Some(seconds) => builder
                .instance(Arc::new(FixedClock(seconds)))
                .bind::<dyn Clock, FixedClock>(|clock| clock as Arc<dyn Clock>),
            None => builder,
        })
        .bootstrap()?;

    run(&engine, &args.name)?;

    println!("{}", serde_json::to_string_pretty(&engine.stats())?);
    engine.clear();
    Ok(())
}

fn run(engine: &Engine, name: &str) -> anyhow::Result<()> {
    let greeter = engine.get::<Greeter>()?;
    info!(message = %greeter.greet(name), "问候完成");

    let first = engine.get::<RequestId>()?;
    let second = engine.get::<RequestId>()?;
    info!(first = first.0, second = second.0, "原型组件每次解析都会新建");

    if let Err(e) = engine.get_named::<Greeter>("missing") {
        warn!(error = %e, "限定符不存在时不会回退到默认绑定");
    }
    Ok(())
}
