mod support;

use std::path::Path;
use std::process::{Child, Command};

use assert_cmd::cargo::cargo_bin;
use taskflow::storage::{FileStore, Storage};

use support::{TestData, PASSWORD, USERNAME};

const WRITERS: usize = 8;

fn spawn_tf(data_dir: &Path, args: &[String]) -> std::io::Result<Child> {
    Command::new(cargo_bin("tf"))
        .env("TF_DATA_DIR", data_dir)
        .env("TF_USERNAME", USERNAME)
        .env("TF_PASSWORD", PASSWORD)
        .env_remove("TF_CONFIG")
        .args(args)
        .spawn()
}

#[test]
fn parallel_task_adds_are_all_kept() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new();
    data.register();

    let children = (0..WRITERS)
        .map(|n| {
            let args = vec![
                "task".to_string(),
                "add".to_string(),
                format!("writer {n}"),
                "-q".to_string(),
            ];
            spawn_tf(data.path(), &args)
        })
        .collect::<std::io::Result<Vec<_>>>()?;

    for mut child in children {
        assert!(child.wait()?.success());
    }

    let storage = Storage::new(FileStore::open(data.path())?);
    let mut titles: Vec<String> = storage
        .load_tasks()?
        .into_iter()
        .map(|task| task.title)
        .collect();
    titles.sort();
    let expected: Vec<String> = (0..WRITERS).map(|n| format!("writer {n}")).collect();
    assert_eq!(titles, expected);
    Ok(())
}
