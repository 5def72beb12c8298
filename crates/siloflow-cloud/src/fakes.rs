//! In-memory fakes for the service traits
//!
//! All state lives in memory and every mutation is recorded, so tests can
//! assert on call counts (creations, attachments, authorizations) as well
//! as on outcomes. Shared by unit tests here and by the pipeline
//! integration tests in the `siloflow` crate.

use crate::error::{CloudError, Result};
use crate::services::{
    AddressResolver, BucketProbe, IdentityService, IngressOutcome, NetworkSecurity, ObjectStore,
    WarehouseControlPlane,
};
use async_trait::async_trait;
use siloflow_core::{ClusterInfo, ClusterSpec, Endpoint, IngressRule, WAREHOUSE_PORT};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Object store fake backed by a set of bucket names.
#[derive(Default)]
pub struct FakeObjectStore {
    buckets: Mutex<HashSet<String>>,
    forbidden: Mutex<HashSet<String>>,
    created_constraints: Mutex<Vec<Option<String>>>,
    uploads: Mutex<Vec<(String, String, PathBuf)>>,
    create_calls: AtomicUsize,
    fail_creates: AtomicBool,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(name: &str) -> Self {
        let store = Self::new();
        store.buckets.lock().unwrap().insert(name.to_string());
        store
    }

    pub fn set_forbidden(&self, name: &str) {
        self.forbidden.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn created_constraints(&self) -> Vec<Option<String>> {
        self.created_constraints.lock().unwrap().clone()
    }

    /// Uploaded (bucket, key) pairs in upload order.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(bucket, key, _)| (bucket.clone(), key.clone()))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn head_bucket(&self, name: &str) -> Result<BucketProbe> {
        if self.forbidden.lock().unwrap().contains(name) {
            return Ok(BucketProbe::Forbidden);
        }
        if self.buckets.lock().unwrap().contains(name) {
            Ok(BucketProbe::Exists)
        } else {
            Ok(BucketProbe::Missing)
        }
    }

    async fn create_bucket(&self, name: &str, location_constraint: Option<&str>) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(CloudError::ObjectStore("simulated create failure".into()));
        }
        self.created_constraints
            .lock()
            .unwrap()
            .push(location_constraint.map(str::to_string));
        self.buckets.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        self.uploads
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), path.to_path_buf()));
        Ok(())
    }
}

/// Identity service fake backed by a name -> ARN map.
#[derive(Default)]
pub struct FakeIdentityService {
    roles: Mutex<HashMap<String, String>>,
    attachments: Mutex<Vec<(String, String)>>,
    create_calls: AtomicUsize,
}

impl FakeIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(name: &str, arn: &str) -> Self {
        let identity = Self::new();
        identity
            .roles
            .lock()
            .unwrap()
            .insert(name.to_string(), arn.to_string());
        identity
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn attachments(&self) -> Vec<(String, String)> {
        self.attachments.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn get_role_arn(&self, name: &str) -> Result<Option<String>> {
        Ok(self.roles.lock().unwrap().get(name).cloned())
    }

    async fn create_role(
        &self,
        name: &str,
        _trust_policy: &str,
        _description: &str,
    ) -> Result<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let arn = format!("arn:aws:iam::000000000000:role/{name}");
        self.roles
            .lock()
            .unwrap()
            .insert(name.to_string(), arn.clone());
        Ok(arn)
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.attachments
            .lock()
            .unwrap()
            .push((role_name.to_string(), policy_arn.to_string()));
        Ok(())
    }
}

/// Warehouse control-plane fake; created clusters become available
/// immediately so waits return on the first poll.
#[derive(Default)]
pub struct FakeControlPlane {
    clusters: Mutex<HashMap<String, ClusterInfo>>,
    create_calls: AtomicUsize,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_available_cluster(identifier: &str) -> Self {
        let control = Self::new();
        control
            .clusters
            .lock()
            .unwrap()
            .insert(identifier.to_string(), Self::available(identifier));
        control
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn available(identifier: &str) -> ClusterInfo {
        ClusterInfo {
            identifier: identifier.to_string(),
            status: "available".to_string(),
            endpoint: Some(Endpoint {
                address: format!("{identifier}.abc123.fake.example.com"),
                port: WAREHOUSE_PORT,
            }),
            vpc_id: Some("vpc-0123456789abcdef0".to_string()),
            security_group_ids: vec!["sg-0123456789abcdef0".to_string()],
        }
    }
}

#[async_trait]
impl WarehouseControlPlane for FakeControlPlane {
    async fn describe_cluster(&self, identifier: &str) -> Result<Option<ClusterInfo>> {
        Ok(self.clusters.lock().unwrap().get(identifier).cloned())
    }

    async fn create_cluster(&self, spec: &ClusterSpec) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.clusters
            .lock()
            .unwrap()
            .insert(spec.identifier.clone(), Self::available(&spec.identifier));
        Ok(())
    }
}

/// Network security fake that reports duplicates like the real service.
#[derive(Default)]
pub struct FakeNetworkSecurity {
    rules: Mutex<Vec<IngressRule>>,
    authorize_calls: AtomicUsize,
}

impl FakeNetworkSecurity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> Vec<IngressRule> {
        self.rules.lock().unwrap().clone()
    }

    pub fn authorize_calls(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkSecurity for FakeNetworkSecurity {
    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<IngressOutcome> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        let mut rules = self.rules.lock().unwrap();
        let duplicate = rules.iter().any(|existing| {
            existing.security_group_id == rule.security_group_id
                && existing.cidr_ip == rule.cidr_ip
                && existing.port == rule.port
        });
        if duplicate {
            return Ok(IngressOutcome::AlreadyExists);
        }
        rules.push(rule.clone());
        Ok(IngressOutcome::Authorized)
    }
}

/// Address resolver fake returning a fixed IP, or failing on demand.
pub struct FakeAddressResolver {
    ip: Option<String>,
}

impl FakeAddressResolver {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Some(ip.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { ip: None }
    }
}

#[async_trait]
impl AddressResolver for FakeAddressResolver {
    async fn public_ip(&self) -> Result<String> {
        self.ip
            .clone()
            .ok_or_else(|| CloudError::AddressLookup("simulated lookup failure".into()))
    }
}
