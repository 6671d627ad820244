// tests/live_children_property.rs

use std::time::Duration;

use proptest::prelude::*;
use tempfile::tempdir;
use tokio::sync::mpsc;
use watchrun::types::{FileEvent, FileEventKind};
use watchrun_test_utils::{fake_supervisor, ChildBehaviour, SupervisorConfigBuilder};

#[derive(Debug, Clone)]
enum Step {
    Event { file: &'static str, kind: FileEventKind },
    FailNextSpawn,
    Behaviour(ChildBehaviour),
    Restart,
}

fn kind_strategy() -> impl Strategy<Value = FileEventKind> {
    prop_oneof![
        4 => Just(FileEventKind::Modified),
        1 => Just(FileEventKind::Created),
        1 => Just(FileEventKind::Deleted),
        1 => Just(FileEventKind::Moved),
        1 => Just(FileEventKind::Other),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (prop::sample::select(vec!["a.py", "pkg/b.py", "c.txt", "README.md"]), kind_strategy())
            .prop_map(|(file, kind)| Step::Event { file, kind }),
        1 => Just(Step::FailNextSpawn),
        1 => prop::sample::select(vec![
            ChildBehaviour::Obedient,
            ChildBehaviour::IgnoresTerm,
            ChildBehaviour::ExitsImmediately,
        ])
        .prop_map(Step::Behaviour),
        1 => Just(Step::Restart),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn never_more_than_one_live_child(steps in prop::collection::vec(step_strategy(), 0..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let dir = tempdir().unwrap();
        let cfg = SupervisorConfigBuilder::new(dir.path())
            .stop_timeout(Duration::from_millis(1))
            .build();
        let (mut sup, launcher, _notifier) = fake_supervisor(cfg);
        let (tx, _rx) = mpsc::unbounded_channel();

        rt.block_on(async {
            sup.start(tx).unwrap();

            for step in steps {
                match step {
                    Step::Event { file, kind } => {
                        let before = sup.child_id();
                        let spawned_before = launcher.spawn_count();
                        let event = FileEvent::new(dir.path().join(file), kind);
                        let qualifies = kind == FileEventKind::Modified && file.ends_with(".py");

                        let result = sup.on_file_event(&event).await;
                        if !qualifies {
                            assert!(!result.unwrap());
                            assert_eq!(sup.child_id(), before);
                            assert_eq!(launcher.spawn_count(), spawned_before);
                        } else if let Err(err) = result {
                            assert!(err.is_recoverable(), "unexpected error: {err}");
                        }
                    }
                    Step::FailNextSpawn => launcher.fail_next_spawns(1),
                    Step::Behaviour(b) => launcher.set_child_behaviour(b),
                    Step::Restart => {
                        if let Err(err) = sup.restart().await {
                            assert!(err.is_recoverable(), "unexpected error: {err}");
                        }
                    }
                }

                assert!(launcher.live_count() <= 1);
            }

            sup.stop().await.unwrap();
        });

        prop_assert!(launcher.max_live() <= 1);
        prop_assert_eq!(launcher.live_count(), 0);
    }
}
