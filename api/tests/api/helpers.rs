use std::{
  fs,
  path::PathBuf,
  time::{Duration, SystemTime},
};

use myapi::{Config, MyApi};
use uuid::Uuid;

pub struct TestApp {
  pub app: MyApi,
  pub dir: PathBuf,
}

impl TestApp {
  pub fn new(page_size: usize) -> Self {
    let dir = std::env::temp_dir().join(format!("myapi-test-{}", Uuid::new_v4()));
    let config = Config::new(&dir).with_page_size(page_size);
    Self {
      app: MyApi::new(config).expect("could not open test history"),
      dir,
    }
  }

  /// History file names, sorted.
  pub fn history_files(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(&self.dir)
      .unwrap()
      .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  pub fn write_raw(&self, id: &str, contents: &str) {
    fs::write(self.dir.join(format!("{id}.json")), contents).unwrap();
  }

  pub fn set_age(&self, id: &str, age: Duration) {
    let file = fs::File::options()
      .write(true)
      .open(self.dir.join(format!("{id}.json")))
      .unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
  }
}

impl Drop for TestApp {
  fn drop(&mut self) {
    let _ = fs::remove_dir_all(&self.dir);
  }
}

pub fn spawn_test_app() -> TestApp {
  TestApp::new(myapi::config::DEFAULT_PAGE_SIZE)
}
