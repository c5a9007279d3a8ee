use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const POINTS: &str = "0,0,0\n10,0,0\n10,10,0\n0,10,2\n";

fn build_surface(dir: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
    let input = dir.child("pts.csv");
    input.write_str(POINTS).unwrap();
    let surface = dir.child("surface.xml");
    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "build",
            input.path().to_str().unwrap(),
            "--output",
            surface.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Triangles: 2"));
    surface
}

#[test]
fn build_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let surface = build_surface(&dir);
    surface.assert(predicate::str::contains("<Faces>"));
    dir.close().unwrap();
}

#[test]
fn build_with_config_and_override() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("pts.csv");
    // a single sliver with a 168 degree corner
    input.write_str("0,0,0\n20,0,0\n10,1,0\n").unwrap();
    let config = dir.child("tin.json");
    config.write_str(r#"{ "max_angle": 120.0 }"#).unwrap();
    let surface = dir.child("surface.xml");

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "build",
            input.path().to_str().unwrap(),
            "--output",
            surface.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
            "--max-length",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Triangles: 0"));
    dir.close().unwrap();
}

#[test]
fn contours_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let surface = build_surface(&dir);
    let output = dir.child("contours.geojson");

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "contours",
            surface.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
            "--major",
            "2",
            "--minor",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Major: 0, Minor: 1"));

    output.assert(predicate::str::contains("LineString"));
    dir.close().unwrap();
}

#[test]
fn contours_reject_zero_interval() {
    let dir = assert_fs::TempDir::new().unwrap();
    let surface = build_surface(&dir);
    let output = dir.child("contours.geojson");

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "contours",
            surface.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
            "--minor",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minor interval"));
    dir.close().unwrap();
}

#[test]
fn boundary_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let surface = build_surface(&dir);
    let output = dir.child("boundary.geojson");

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "boundary",
            surface.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loops: 1"));

    output.assert(predicate::path::exists());
    dir.close().unwrap();
}

#[test]
fn info_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let surface = build_surface(&dir);

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args(["info", surface.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 4"))
        .stdout(predicate::str::contains("Elevation: 0.000 to 2.000"));
    dir.close().unwrap();
}

#[test]
fn exports_use_the_saved_origin() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("pts.csv");
    input
        .write_str("500000,4000000,100\n500010,4000000,101\n500010,4000010,104\n500000,4000010,103\n")
        .unwrap();
    let surface = dir.child("site.xml");
    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "build",
            input.path().to_str().unwrap(),
            "--output",
            surface.path().to_str().unwrap(),
        ])
        .assert()
        .success();
    dir.child("site.origin.json")
        .assert(predicate::str::contains("500000"));
    // the surface itself holds local coordinates
    surface.assert(predicate::str::contains("500000").not());

    let output = dir.child("site.geojson");
    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "contours",
            surface.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
            "--major",
            "5",
            "--minor",
            "1",
        ])
        .assert()
        .success();
    output.assert(predicate::str::contains("40000"));

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args(["info", surface.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Origin: Z1 (500000.000, 4000000.000)"))
        .stdout(predicate::str::contains("Elevation: 100.000 to 104.000"));
    dir.close().unwrap();
}

#[test]
fn collinear_points_fail() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("line.csv");
    input.write_str("0,0,0\n1,1,0\n2,2,0\n").unwrap();
    let surface = dir.child("surface.xml");

    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args([
            "build",
            input.path().to_str().unwrap(),
            "--output",
            surface.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3 non-collinear points"));
    surface.assert(predicate::path::missing());
    dir.close().unwrap();
}

#[test]
fn missing_surface_fails() {
    Command::cargo_bin("trails_tin_cli")
        .unwrap()
        .args(["info", "does_not_exist.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading does_not_exist.xml"));
}
