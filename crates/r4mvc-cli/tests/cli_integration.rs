//! End-to-end runs of the `r4mvc` binary against a temporary project.

use std::path::Path;
use std::process::{Command, Output};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn sample_project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "App.csproj", "<Project Sdk=\"Microsoft.NET.Sdk.Web\" />\n");
    write(
        root,
        "Controllers/HomeController.cs",
        r"
using Microsoft.AspNetCore.Mvc;

namespace App.Controllers
{
    public partial class HomeController : Controller
    {
        public IActionResult Index() { return View(); }
        public IActionResult About() { return View(); }
        [NonAction]
        public void Helper() { }
    }
}
",
    );
    write(
        root,
        "Controllers/AccountController.cs",
        r"
namespace App.Controllers;

public partial class AccountController : Controller
{
    public IActionResult Login(string returnUrl) { return View(); }
}
",
    );
    write(root, "Views/Home/Index.cshtml", "<h1>Home</h1>");
    write(root, "Views/Account/Login.cshtml", "<form></form>");
    write(root, "Views/_ViewStart.cshtml", "@{ Layout = null; }");
    write(root, "wwwroot/css/site.css", "body {}");
    write(root, "wwwroot/js/app.js", "");
    tmp
}

fn r4mvc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_r4mvc"))
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("R4MVC_HELPERS_PREFIX")
        .env_remove("R4MVC_NAMESPACE")
        .env_remove("R4MVC_LINKS_CLASS")
        .env_remove("R4MVC_OUTPUT_FILE")
        .output()
        .unwrap()
}

#[test]
fn test_generate_writes_helpers() {
    let tmp = sample_project();
    let project = tmp.path().to_str().unwrap();

    let out = r4mvc(&["-p", project, "generate"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(tmp.path().join("R4Mvc.generated.cs")).unwrap();
    assert!(text.starts_with("// <auto-generated />"));
    assert!(text.contains("namespace App.Controllers"));
    assert!(text.contains("public partial class HomeController"));
    assert!(text.contains("public readonly string About = \"About\";"));
    assert!(!text.contains("Helper"));
    assert!(text.contains("public readonly string Index = \"~/Views/Home/Index.cshtml\";"));
    assert!(text.contains("public readonly string Login = \"~/Views/Account/Login.cshtml\";"));
    assert!(!text.contains("_ViewStart"));
    assert!(text.contains(
        "public static global::App.Controllers.AccountController Account = new global::App.Controllers.AccountController();"
    ));
    assert!(text.contains("public static string site_css = \"css/site.css\";"));
    assert!(text.contains("public static string app_js = \"js/app.js\";"));
}

#[test]
fn test_generate_is_stable_across_runs() {
    let tmp = sample_project();
    let project = tmp.path().to_str().unwrap();
    let path = tmp.path().join("R4Mvc.generated.cs");

    assert!(r4mvc(&["-p", project, "generate"]).status.success());
    let first = std::fs::read(&path).unwrap();
    // The generated file itself must not be picked up as a source
    assert!(r4mvc(&["-p", project, "generate"]).status.success());
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generate_accepts_csproj_and_overrides() {
    let tmp = sample_project();
    let csproj = tmp.path().join("App.csproj");

    let out = r4mvc(&[
        "-p",
        csproj.to_str().unwrap(),
        "generate",
        "--namespace",
        "App.Generated",
        "--output",
        "Generated/Mvc.cs",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(tmp.path().join("Generated/Mvc.cs")).unwrap();
    assert!(text.contains("namespace App.Generated"));
    assert!(!tmp.path().join("R4Mvc.generated.cs").exists());
}

#[test]
fn test_dry_run_prints_without_writing() {
    let tmp = sample_project();
    let out = r4mvc(&["-p", tmp.path().to_str().unwrap(), "generate", "--dry-run"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("public static partial class MVC"));
    assert!(!tmp.path().join("R4Mvc.generated.cs").exists());
}

#[test]
fn test_collision_fails_without_output() {
    let tmp = sample_project();
    write(
        tmp.path(),
        "Areas/Admin/HomeController.cs",
        "namespace App.Admin { public partial class HomeController : Controller { } }",
    );

    let out = r4mvc(&["-p", tmp.path().to_str().unwrap(), "generate"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("collision"), "{stderr}");
    assert!(!tmp.path().join("R4Mvc.generated.cs").exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let tmp = sample_project();
    write(tmp.path(), "r4mvc.toml", "[generation]\nlinks_class = \"not valid\"\n");
    let out = r4mvc(&["-p", tmp.path().to_str().unwrap(), "generate"]);
    assert!(!out.status.success());
}

#[test]
fn test_inspect_prints_model() {
    let tmp = sample_project();
    let out = r4mvc(&["-p", tmp.path().to_str().unwrap(), "inspect"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = json["controllers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Account", "Home"]);
    assert_eq!(json["static_files"].as_array().unwrap().len(), 2);
}

#[test]
fn test_inspect_tree() {
    let tmp = sample_project();
    let out = r4mvc(&["-p", tmp.path().to_str().unwrap(), "inspect", "--tree"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["usings"][1], "System.Diagnostics");
}

#[test]
fn test_missing_project_fails() {
    let out = r4mvc(&["-p", "/nonexistent/r4mvc/project", "generate"]);
    assert!(!out.status.success());
}
