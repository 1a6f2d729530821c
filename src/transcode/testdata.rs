//! Shared schema model for the transcoder tests.

use crate::config::TranscoderConfig;
use crate::fieldpath::SkipPaths;
use crate::schema::{SchemaModel, SchemaNode};
use crate::value::{from_yaml, Value};

pub(super) const MODEL: &str = r#"definitions:
  Deployment:
    kind:
      fields:
      - name: apiVersion
        type:
          primitive:
            type: string
      - name: kind
        type:
          primitive:
            type: string
      - name: metadata
        type:
          reference: ObjectMeta
      - name: spec
        type:
          reference: DeploymentSpec
      - name: status
        type:
          reference: DeploymentStatus
  ObjectMeta:
    kind:
      fields:
      - name: name
        type:
          primitive:
            type: string
      - name: namespace
        type:
          primitive:
            type: string
      - name: labels
        type:
          map:
            primitive:
              type: string
      - name: annotations
        type:
          map:
            primitive:
              type: string
      - name: uid
        type:
          primitive:
            type: string
      - name: resourceVersion
        type:
          primitive:
            type: string
  DeploymentSpec:
    kind:
      fields:
      - name: replicas
        type:
          primitive:
            type: integer
            format: int32
      - name: selector
        type:
          reference: LabelSelector
      - name: template
        type:
          reference: PodTemplateSpec
  DeploymentStatus:
    kind:
      fields:
      - name: replicas
        type:
          primitive:
            type: integer
  LabelSelector:
    kind:
      fields:
      - name: matchLabels
        type:
          map:
            primitive:
              type: string
  PodTemplateSpec:
    kind:
      fields:
      - name: metadata
        type:
          reference: ObjectMeta
      - name: spec
        type:
          reference: PodSpec
  PodSpec:
    kind:
      fields:
      - name: containers
        type:
          array:
            reference: Container
      - name: terminationGracePeriodSeconds
        type:
          primitive:
            type: integer
  Container:
    kind:
      fields:
      - name: name
        type:
          primitive:
            type: string
      - name: image
        type:
          primitive:
            type: string
      - name: args
        type:
          array:
            primitive:
              type: string
      - name: ports
        type:
          array:
            reference: ContainerPort
      - name: env
        type:
          array:
            reference: EnvVar
      required: [name]
  ContainerPort:
    kind:
      fields:
      - name: containerPort
        type:
          primitive:
            type: integer
      - name: protocol
        type:
          primitive:
            type: string
  EnvVar:
    kind:
      fields:
      - name: name
        type:
          primitive:
            type: string
      - name: value
        type:
          primitive:
            type: string
  Service:
    kind:
      fields:
      - name: metadata
        type:
          reference: ObjectMeta
      - name: spec
        type:
          kind:
            fields:
            - name: ports
              type:
                array:
                  reference: ServicePort
  ServicePort:
    kind:
      fields:
      - name: port
        type:
          primitive:
            type: integer
      - name: targetPort
        type:
          primitive:
            type: string
            format: int-or-string
  JSONSchemaProps:
    kind:
      fields:
      - name: type
        type:
          primitive:
            type: string
      - name: properties
        type:
          map:
            reference: JSONSchemaProps
      - name: items
        type:
          reference: JSONSchemaProps
  Routing:
    kind:
      fields:
      - name: selectors
        type:
          map:
            reference: Route
  Route:
    kind:
      fields:
      - name: name
        type:
          primitive:
            type: string
      - name: internal
        type:
          primitive:
            type: string
  Settings:
    kind:
      fields:
      - name: color
        type:
          primitive:
            type: string
            format: color
      - name: shade
        type:
          primitive:
            type: integer
            format: rgb
      - name: fooBar
        type:
          primitive:
            type: string
      - name: foo_bar
        type:
          primitive:
            type: string
  Guarded:
    kind:
      fields:
      - name: name
        type:
          primitive:
            type: string
      - name: selector
        type:
          reference: LabelSelector
      required: [selector]
resources:
- group: apps
  version: v1
  kind: Deployment
  definition: Deployment
- version: v1
  kind: Service
  definition: Service
"#;

pub(super) fn model() -> SchemaModel {
    SchemaModel::from_yaml(MODEL).expect("test model parses")
}

pub(super) fn skip() -> SkipPaths {
    TranscoderConfig::default().skip_paths()
}

/// Root node of a definition by name.
pub(super) fn root(model: &SchemaModel, name: &str) -> SchemaNode {
    model
        .resolve_reference(name)
        .unwrap_or_else(|| panic!("definition {} missing", name))
        .clone()
}

pub(super) fn yaml(doc: &str) -> Value {
    from_yaml(doc).unwrap_or_else(|e| panic!("bad test YAML: {}\n{}", e, doc))
}

pub(super) const DEPLOYMENT_REMOTE: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: default
  uid: 6f1c2a
  resourceVersion: "12"
  labels:
    app: web
  annotations:
    kubectl.kubernetes.io/last-applied-configuration: "{}"
    team: platform
spec:
  replicas: 3
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: web
        image: nginx:1.25
        ports:
        - containerPort: 80
      terminationGracePeriodSeconds: 30
status:
  replicas: 3
"#;

pub(super) const DEPLOYMENT_LOCAL: &str = r#"- api_version: apps/v1
  kind: Deployment
  metadata:
  - name: web
    namespace: default
    labels:
      app: web
    annotations:
      team: platform
  spec:
  - replicas: 3
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
          image: nginx:1.25
          ports:
          - container_port: 80
        termination_grace_period_seconds: 30
"#;
