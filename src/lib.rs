pub mod codec;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod replay;
pub mod rng;
pub mod rules;

#[cfg(feature = "server")]
pub mod arbiter;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod hosting;
#[cfg(feature = "server")]
pub mod ml;
#[cfg(feature = "server")]
pub mod orchestrator;
#[cfg(feature = "server")]
pub mod persistence;
#[cfg(feature = "server")]
pub mod ratelimit;
#[cfg(feature = "server")]
pub mod scheduler;
#[cfg(feature = "server")]
pub mod session;
#[cfg(feature = "server")]
pub mod training;

/// grid/replay dimensional types
pub type Seed = u32;
pub type Frame = u32;
pub type Millis = i64;
pub type Probability = f32;

/// initialize logging: term + timestamped file, matching the teacher's setup
#[cfg(feature = "server")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let cfg = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        cfg.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        cfg,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// current wall-clock time as milliseconds since the epoch
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_millis() as i64
}
