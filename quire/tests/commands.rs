#![allow(clippy::unwrap_used, reason = "Fine in tests")]

use std::fs;

use quire::{commands, posts::BuildMode};
use quire_config::Config;
use serde_json::Value;
use tempfile::TempDir;

const ARTICLE: &str = "---
title: Why C++
aside: left
---

# Why C++

Modern c++ is fine.

## Setup

### Toolchain

## History {.ignore-header}

### Early days

## Summary
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, contents).unwrap();
  path
}

#[test]
fn test_stats_reports_words_and_minutes() {
  let dir = TempDir::new().unwrap();
  let article = write(&dir, "article.md", ARTICLE);

  let out = commands::stats(&Config::default(), &[&article], true).unwrap();
  let stats: Value = serde_json::from_str(&out).unwrap();
  assert_eq!(stats[0]["wordCount"], 12);
  assert_eq!(stats[0]["readingMinutes"], 1);
}

#[test]
fn test_render_wraps_cpp() {
  let dir = TempDir::new().unwrap();
  let article = write(&dir, "article.md", ARTICLE);

  let html = commands::render(&Config::default(), &article).unwrap();
  assert!(html.contains("<p>Modern <nobr>c++</nobr> is fine.</p>"));
  assert!(!html.contains("title: Why C++"));

  let mut config = Config::default();
  config.markup.nobr = false;
  let html = commands::render(&config, &article).unwrap();
  assert!(!html.contains("<nobr>"));
}

#[test]
fn test_outline_skips_ignored_section() {
  let dir = TempDir::new().unwrap();
  let article = write(&dir, "article.md", ARTICLE);

  let out = commands::outline(&Config::default(), &article, true).unwrap();
  let view: Value = serde_json::from_str(&out).unwrap();
  assert_eq!(view["label"], "Contents");
  assert_eq!(view["shown"], true);
  assert_eq!(view["leftAside"], true);

  let items = view["items"].as_array().unwrap();
  let links: Vec<&str> =
    items.iter().map(|i| i["link"].as_str().unwrap()).collect();
  assert_eq!(links, vec!["#setup", "#summary"]);
  assert_eq!(items[0]["children"][0]["link"], "#toolchain");

  let text = commands::outline(&Config::default(), &article, false).unwrap();
  assert_eq!(
    text,
    "Contents\n- Setup #setup\n  - Toolchain #toolchain\n- Summary #summary\n"
  );
}

#[test]
fn test_sidebar_marks_active_page() {
  let mut config = Config::default();
  config.sidebar = Some(
    serde_json::from_value(serde_json::json!({
      "/guide/": [
        { "text": "Intro", "link": "/guide/" },
        {
          "text": "Basics",
          "collapsed": true,
          "items": [
            { "text": "Install", "link": "/guide/install" },
            { "text": "Usage", "link": "/guide/usage" },
          ],
        },
      ],
    }))
    .unwrap(),
  );

  let text =
    commands::sidebar(&config, "guide/install.md", "", false).unwrap();
  assert_eq!(
    text,
    "Intro\n[-] Basics\n  Install *\n  Usage\nPrevious: Intro \
     (/guide/)\nNext: Usage (/guide/usage)\n"
  );

  let json = commands::sidebar(&config, "/guide/", "", true).unwrap();
  let view: Value = serde_json::from_str(&json).unwrap();
  assert_eq!(view["groups"][1]["collapsed"], true);
  assert_eq!(view["groups"][0]["items"][0]["isActiveLink"], true);
  assert_eq!(view["next"]["link"], "/guide/install");

  let none = commands::sidebar(&config, "/blog/", "", false).unwrap();
  assert_eq!(none, "No sidebar for /blog/\n");
}

#[test]
fn test_posts_in_production() {
  let dir = TempDir::new().unwrap();
  let files = vec![
    write(&dir, "index.md", "# Posts"),
    write(&dir, "test.md", "---\ntitle: Scratch\ndate: 2030-01-01\n---\n"),
    write(
      &dir,
      "draft.md",
      "---\ntitle: Draft\ndate: 2024-06-01\ndraft: true\n---\n",
    ),
    write(
      &dir,
      "first.md",
      "---\ntitle: First\ndate: 2023-02-11\n---\nHello there.\n",
    ),
    write(
      &dir,
      "second.md",
      "---\ntitle: Second\ndate: 2024-01-01T09:30:00Z\n---\nAgain.\n",
    ),
  ];

  let out =
    commands::posts(&Config::default(), &files, BuildMode::Production, true)
      .unwrap();
  let posts: Value = serde_json::from_str(&out).unwrap();
  let paths: Vec<&str> = posts
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["path"].as_str().unwrap())
    .collect();
  assert_eq!(paths, vec!["second", "first"]);
  assert_eq!(posts[0]["date"], "2024-01-01");
  assert_eq!(posts[1]["wordCount"], 2);

  let dev =
    commands::posts(&Config::default(), &files, BuildMode::Development, false)
      .unwrap();
  assert!(dev.starts_with("January 1st 2030"));
  assert!(dev.contains("February 11th 2023"));
}
