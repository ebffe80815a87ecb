use criterion::{Criterion, criterion_group, criterion_main};
use r4mvc_parser::snapshot::ProgramSnapshot;
use r4mvc_parser::{DefaultConvention, SourceFile, analyze};
use std::hint::black_box;

const SAMPLE_CONTROLLER: &str = r#"
using System.Threading.Tasks;
using Microsoft.AspNetCore.Mvc;

namespace Shop.Controllers
{
    public partial class ProductsController : Controller
    {
        private readonly IProductRepository _products;

        public ProductsController(IProductRepository products)
        {
            _products = products;
        }

        public async Task<IActionResult> Index(int page = 1)
        {
            var items = await _products.ListAsync(page);
            return View(items);
        }

        public async Task<IActionResult> Details(int id)
        {
            var item = await _products.FindAsync(id);
            if (item == null)
            {
                return NotFound();
            }
            return View(item);
        }

        [HttpGet]
        public IActionResult Create() => View();

        [HttpPost]
        [ValidateAntiForgeryToken]
        public async Task<IActionResult> Create(ProductModel model)
        {
            if (!ModelState.IsValid)
            {
                return View(model);
            }
            await _products.AddAsync(model);
            return RedirectToAction(nameof(Index));
        }

        [NonAction]
        public string Slug(string name) => name.ToLowerInvariant();
    }
}
"#;

fn make_sources(count: usize) -> Vec<SourceFile> {
    (0..count)
        .map(|i| {
            SourceFile::new(
                format!("Controllers/Products{i}Controller.cs"),
                SAMPLE_CONTROLLER.replace("ProductsController", &format!("Products{i}Controller")),
            )
        })
        .collect()
}

fn bench_snapshot(c: &mut Criterion) {
    let sources = make_sources(50);
    c.bench_function("snapshot_50_controllers", |b| {
        b.iter(|| ProgramSnapshot::from_sources(black_box(&sources)));
    });
}

fn bench_analyze(c: &mut Criterion) {
    let sources = make_sources(50);
    let snapshot = ProgramSnapshot::from_sources(&sources).unwrap();
    let convention = DefaultConvention::default();
    c.bench_function("analyze_50_controllers", |b| {
        b.iter(|| analyze(black_box(&snapshot), &convention));
    });
}

criterion_group!(benches, bench_snapshot, bench_analyze);
criterion_main!(benches);
