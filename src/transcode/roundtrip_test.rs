use super::testdata::{model, root, skip, yaml, DEPLOYMENT_LOCAL, DEPLOYMENT_REMOTE};
use super::{ReadTranscoder, WriteTranscoder};
use crate::patch::{self, OpKind};
use crate::schema::SchemaModel;
use crate::state::SnapshotRepository;
use crate::value::Value;
use pretty_assertions::assert_eq;

fn read(model: &SchemaModel, definition: &str, remote: &Value) -> Option<Value> {
    let skip = skip();
    ReadTranscoder::new(model, &skip)
        .transcode(&root(model, definition), remote)
        .into_result()
        .unwrap()
}

fn create(model: &SchemaModel, definition: &str, local: &Value) -> Option<Value> {
    let skip = skip();
    WriteTranscoder::new(model, &skip)
        .build_create_payload(&root(model, definition), local)
        .into_result()
        .unwrap()
}

#[test]
fn test_read_of_created_payload_is_identity() {
    let model = model();
    let locals = [
        ("Deployment", DEPLOYMENT_LOCAL),
        (
            "Service",
            "- spec:\n  - ports:\n    - port: 80\n      target_port: \"8080\"\n    - port: 81\n      target_port: http\n    - port: 82\n      target_port: \"+5\"\n    - port: 83\n      target_port: \"-0\"\n",
        ),
        (
            "Container",
            "- name: app\n  args: [\"$\\\\{A}\", plain]\n  env:\n  - name: X\n    value: \"a $\\\\{b}\"\n",
        ),
        (
            "JSONSchemaProps",
            "- type: object\n  properties:\n    inner:\n    - type: array\n      items:\n      - type: string\n",
        ),
    ];

    for (definition, local) in locals {
        let local = yaml(local);
        let remote = create(&model, definition, &local).unwrap();
        assert_eq!(read(&model, definition, &remote), Some(local), "{}", definition);
    }
}

#[test]
fn test_diff_of_same_attributes_is_empty() {
    let model = model();
    let skip = skip();
    let local = read(&model, "Deployment", &yaml(DEPLOYMENT_REMOTE)).unwrap();

    let ops = WriteTranscoder::new(&model, &skip)
        .diff_to_patch(&root(&model, "Deployment"), &local, &local)
        .into_result()
        .unwrap();
    assert!(ops.is_empty(), "unexpected ops: {:?}", ops);
}

#[test]
fn test_applied_patch_reads_back_as_new_attributes() {
    let model = model();
    let skip = skip();
    let deployment = root(&model, "Deployment");
    let mut remote = yaml(DEPLOYMENT_REMOTE);
    let previous = read(&model, "Deployment", &remote).unwrap();

    let current = yaml(
        r#"
- api_version: apps/v1
  kind: Deployment
  metadata:
  - name: web
    labels:
      app: web
      tier: front
    annotations:
      team: platform
  spec:
  - replicas: 5
    selector:
    - match_labels:
        app: web
    template:
    - metadata:
      - labels:
          app: web
      spec:
      - containers:
        - name: web
          image: nginx:1.26
          ports:
          - container_port: 80
        termination_grace_period_seconds: 30
  status:
  - replicas: 9
"#,
    );

    let ops = WriteTranscoder::new(&model, &skip)
        .diff_to_patch(&deployment, &previous, &current)
        .into_result()
        .unwrap();
    let rendered: Vec<String> = ops.iter().map(|op| op.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "remove /metadata/namespace",
            r#"add /metadata/labels/tier "front""#,
            "replace /spec/replicas 5",
            r#"replace /spec/template/spec/containers [{"image":"nginx:1.26","name":"web","ports":[{"containerPort":80}]}]"#,
        ]
    );
    assert!(ops.iter().all(|op| !op.pointer.to_string().starts_with("/status")));

    let payload = patch::serialize(&ops).unwrap();
    patch::apply(&mut remote, &patch::deserialize(&payload).unwrap()).unwrap();

    let mut expected = current.clone();
    if let Value::List(block) = &mut expected {
        if let Some(Value::Map(object)) = block.first_mut() {
            object.delete("status");
        }
    }
    assert_eq!(read(&model, "Deployment", &remote), Some(expected));

    // Server-managed fields survive the patch untouched.
    let status = remote.as_map().and_then(|m| m.get("status")).cloned();
    assert_eq!(status, Some(yaml("replicas: 3\n")));
}

#[test]
fn test_snapshot_drives_update() {
    let model = model();
    let skip = skip();
    let deployment = root(&model, "Deployment");
    let mut snapshots = SnapshotRepository::new();
    let id = "default/Deployment/web";

    let applied = read(&model, "Deployment", &yaml(DEPLOYMENT_REMOTE)).unwrap();
    snapshots.store(id, applied.clone());

    let mut current = applied;
    if let Some(mut spec) = current
        .as_block()
        .and_then(|m| m.get("spec"))
        .and_then(Value::as_block)
        .cloned()
    {
        spec.set("replicas", Value::Int(1));
        if let Value::List(block) = &mut current {
            if let Some(Value::Map(object)) = block.first_mut() {
                object.set("spec", Value::block(spec));
            }
        }
    }

    let previous = snapshots.load(id).unwrap();
    let ops = WriteTranscoder::new(&model, &skip)
        .diff_to_patch(&deployment, previous, &current)
        .value;
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind, OpKind::Replace);
    assert_eq!(ops[0].pointer.to_string(), "/spec/replicas");
}
