use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use tiendita_catalog::{
    CatalogFilter, Category, Product, ProductStatus, Subcategory, category_options,
    compute_installment, filter_products, subcategory_options,
};
use tiendita_core::{CategoryId, ProductId, SubcategoryId};

struct Catalog {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    products: Vec<Product>,
}

fn catalog(size: usize) -> Catalog {
    let categories: Vec<Category> = (0..12)
        .map(|i| Category::new(CategoryId::new(), &format!("Categoría {i}")).unwrap())
        .collect();
    let subcategories: Vec<Subcategory> = (0..48)
        .map(|i| {
            Subcategory::new(
                SubcategoryId::new(),
                Some(categories[i % categories.len()].id),
                &format!("Sub {i}"),
            )
            .unwrap()
        })
        .collect();
    let products = (0..size)
        .map(|i| {
            let sub = &subcategories[i % subcategories.len()];
            let mut p = Product::new(ProductId::new(), format!("Producto {i}"));
            p.category_id = sub.category_id;
            p.subcategory_id = Some(sub.id);
            p.status = ProductStatus::ALL[i % 3];
            p
        })
        .collect();
    Catalog {
        categories,
        subcategories,
        products,
    }
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_filter");

    for size in [100usize, 1_000, 10_000] {
        let data = catalog(size);
        let filter = CatalogFilter {
            category_id: Some(data.categories[3].id),
            subcategory_id: None,
            status: Some(ProductStatus::Available),
        };
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("filter_products", size), &data, |b, data| {
            b.iter(|| filter_products(black_box(&data.products), black_box(&filter)).len());
        });

        group.bench_with_input(BenchmarkId::new("selector_options", size), &data, |b, data| {
            b.iter(|| {
                let cats = category_options(&data.categories, black_box(&data.products));
                let subs = subcategory_options(
                    &data.subcategories,
                    black_box(&data.products),
                    Some(data.categories[3].id),
                );
                cats.len() + subs.len()
            });
        });
    }

    group.finish();
}

fn bench_installments(c: &mut Criterion) {
    c.bench_function("compute_installment", |b| {
        b.iter(|| compute_installment(black_box(1_250_000), black_box(17.5), black_box(12)));
    });
}

criterion_group!(benches, bench_filter, bench_installments);
criterion_main!(benches);
