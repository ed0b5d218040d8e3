use std::sync::Arc;
use std::time::Duration;

use battle_core::{BattleFormat, BattleResult};
use battle_runtime::{BattleRuntime, FirstChoiceDecider};
use client_frontend_cli::{AutoplayFrontend, CliConfig, DemoEngine};
use client_frontend_core::{
    AnimationConfig, BattleSession, Frontend, FrontendConfig, MessageConfig,
};

fn fast_session(format: BattleFormat) -> BattleSession {
    let runtime = BattleRuntime::builder()
        .engine(Arc::new(DemoEngine::new(format)))
        .decider(FirstChoiceDecider)
        .build()
        .unwrap();
    let config = FrontendConfig::new(
        MessageConfig {
            chars_per_second: 0,
            ..MessageConfig::default()
        },
        AnimationConfig {
            reveal: Duration::from_millis(5),
        },
    );
    BattleSession::new(runtime, config)
}

fn fast_config(format: BattleFormat) -> CliConfig {
    CliConfig {
        format,
        frame_interval: Duration::from_millis(1),
        max_frames: 200_000,
        ..CliConfig::default()
    }
}

async fn play(format: BattleFormat) -> (BattleResult, String) {
    let mut frontend = AutoplayFrontend::new(fast_config(format), Vec::new());
    let result = frontend.run(fast_session(format)).await.unwrap();
    let transcript = String::from_utf8(frontend.output().clone()).unwrap();
    (result, transcript)
}

#[tokio::test(flavor = "multi_thread")]
async fn single_battle_plays_to_completion() {
    let (_, transcript) = play(BattleFormat::Single).await;
    assert!(transcript.lines().count() > 4, "{transcript}");
    assert!(transcript.contains("Ember"), "{transcript}");
    assert!(transcript.contains("[turn  1]"), "{transcript}");
}

#[tokio::test(flavor = "multi_thread")]
async fn double_battle_uses_target_selection() {
    let (_, transcript) = play(BattleFormat::Double).await;
    assert!(transcript.contains("Gale"), "{transcript}");
    assert!(transcript.contains("Boulder"), "{transcript}");
}

#[tokio::test(flavor = "multi_thread")]
async fn gives_up_after_the_frame_budget() {
    let format = BattleFormat::Single;
    let config = CliConfig {
        max_frames: 1,
        ..fast_config(format)
    };
    let mut frontend = AutoplayFrontend::new(config, Vec::new());
    let err = frontend.run(fast_session(format)).await.unwrap_err();
    assert!(err.to_string().contains("1 frames"));
}
