use axum::body::Bytes;
use criterion::{criterion_group, criterion_main, Criterion};
use routebind::{
    bind, parse_route_document, HandlerResult, HandlerSet, HandlerTarget, JsonResponder,
    MethodTable, RequestContext, Responder,
};
use routebind::handlers::SetTarget;
use serde_json::{json, Value};
use std::hint::black_box;
use std::sync::Arc;

fn example_routes() -> &'static str {
    r#"zoo:
  route:
    - get: /
      handler: Root
    - get: /zoo/animals
      handler: GetAnimals
    - post: /zoo/animals
      handler: CreateAnimal
    - get: /zoo/animals/{id}
      handler: GetAnimal
    - put: /zoo/animals/{id}
      handler: UpdateAnimal
    - patch: /zoo/animals/{id}
      handler: PatchAnimal
    - delete: /zoo/animals/{id}
      handler: DeleteAnimal
    - get: /zoo/animals/{id}/toys/{toy_id}
      handler: AnimalToy
    - get: /zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}
      handler: HabitatSection
inventory:
  route:
    - post: /inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}
      handler: PostItemBatch
    - HEAD: /inventory/health
      handler: HealthCheck
    - Options: /inventory/health
      handler: SupportedOps
"#
}

struct Zoo;

impl Zoo {
    fn get_animal(&self, ctx: &mut RequestContext) -> HandlerResult<Value> {
        Ok(json!({ "id": ctx.path_param("id"), "kind": ctx.query_param("kind") }))
    }
}

impl HandlerSet for Zoo {
    fn methods(table: &mut MethodTable<Self>) {
        table.returning("GetAnimal", Zoo::get_animal);
    }
}

fn bench_parse(c: &mut Criterion) {
    let yaml = example_routes().as_bytes();
    c.bench_function("parse_route_document", |b| {
        b.iter(|| {
            let document = parse_route_document(black_box(yaml)).unwrap();
            black_box(document);
        })
    });
}

fn bench_bound_call(c: &mut Criterion) {
    let target: Arc<dyn HandlerTarget> = Arc::new(SetTarget::new(Zoo));
    let responder: Arc<dyn Responder> = Arc::new(JsonResponder::default());
    let bound = bind(&target, "GetAnimal", responder).unwrap();

    c.bench_function("bound_handler_call", |b| {
        b.iter(|| {
            let request = http::Request::builder()
                .uri("/zoo/animals/42?kind=otter")
                .body(Bytes::new())
                .unwrap();
            let mut ctx = RequestContext::from_request(request).with_path_param("id", "42");
            bound.call(&mut ctx);
            black_box(ctx.response_body());
        })
    });
}

criterion_group!(benches, bench_parse, bench_bound_call);
criterion_main!(benches);
