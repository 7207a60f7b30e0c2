//! Scripted in-memory cluster for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use lifecycle_client::{ClientError, Result};
use lifecycle_core::domain::allocation::{Allocation, AllocationListStub, ClientStatus};
use lifecycle_core::domain::fs::AllocFileInfo;
use lifecycle_core::domain::job::{Job, JobType};
use lifecycle_core::domain::node::NodeListStub;
use lifecycle_core::dto::job::{JobDeregisterResponse, JobRegisterResponse};
use uuid::Uuid;

use crate::cluster::Cluster;

/// What the fake scheduler does when a job is registered
#[derive(Debug, Clone)]
pub struct Placement {
    /// Allocations created per registration
    pub count: usize,
    /// Client statuses reported on successive reads; the last one sticks
    pub statuses: Vec<ClientStatus>,
    /// Status reported once the job is deregistered
    pub stopped: ClientStatus,
    /// Entries of the allocation's `alloc` directory
    pub files: Vec<String>,
}

impl Placement {
    pub fn new(statuses: Vec<ClientStatus>, files: &[&str]) -> Self {
        Self {
            count: 1,
            statuses,
            stopped: ClientStatus::Complete,
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Default)]
struct State {
    leader: VecDeque<Result<String>>,
    nodes: Vec<NodeListStub>,
    placement: Option<Placement>,
    job_allocs: HashMap<String, Vec<String>>,
    allocs: HashMap<String, FakeAlloc>,
    registered: Vec<Job>,
    deregistered: Vec<(String, bool)>,
    failing: HashMap<&'static str, u16>,
    calls: HashMap<&'static str, usize>,
}

struct FakeAlloc {
    job_id: String,
    statuses: VecDeque<ClientStatus>,
    files: Vec<String>,
}

impl FakeAlloc {
    fn next_status(&mut self) -> ClientStatus {
        if self.statuses.len() > 1 {
            self.statuses.pop_front().unwrap_or(ClientStatus::Unknown)
        } else {
            self.statuses.front().copied().unwrap_or(ClientStatus::Pending)
        }
    }
}

/// In-memory [`Cluster`] driven by scripted responses
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<State>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cluster with a leader, one ready node and the given placement
    pub fn healthy(placement: Placement) -> Self {
        let cluster = Self::new();
        cluster.add_node("ready", "eligible");
        cluster.set_placement(placement);
        cluster
    }

    /// Responses of successive leader reads; the last one sticks
    pub fn script_leader(&self, responses: Vec<Result<String>>) {
        self.state.lock().unwrap().leader = responses.into();
    }

    pub fn add_node(&self, status: &str, eligibility: &str) {
        let mut state = self.state.lock().unwrap();
        let n = state.nodes.len();
        state.nodes.push(NodeListStub {
            id: format!("node-{}", n),
            name: format!("client-{}", n),
            datacenter: "dc1".to_string(),
            status: status.to_string(),
            scheduling_eligibility: eligibility.to_string(),
            drain: false,
        });
    }

    pub fn set_placement(&self, placement: Placement) {
        self.state.lock().unwrap().placement = Some(placement);
    }

    /// Places one allocation for a job outside of registration
    pub fn place_alloc(&self, job_id: &str, statuses: Vec<ClientStatus>) -> String {
        let mut state = self.state.lock().unwrap();
        insert_alloc(&mut state, job_id, statuses, Vec::new())
    }

    /// Makes every call of an operation fail with a server error
    pub fn fail_on(&self, op: &'static str) {
        self.fail_with(op, 500);
    }

    /// Makes every call of an operation fail with the given HTTP status
    pub fn fail_with(&self, op: &'static str, status: u16) {
        self.state.lock().unwrap().failing.insert(op, status);
    }

    pub fn calls(&self, op: &str) -> usize {
        self.state.lock().unwrap().calls.get(op).copied().unwrap_or(0)
    }

    pub fn registered_ids(&self) -> Vec<String> {
        self.registered().into_iter().filter_map(|j| j.id).collect()
    }

    pub fn registered(&self) -> Vec<Job> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn deregistered(&self) -> Vec<(String, bool)> {
        self.state.lock().unwrap().deregistered.clone()
    }

    fn enter(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(op).or_default() += 1;
        if let Some(&status) = state.failing.get(op) {
            return Err(ClientError::api_error(status, format!("injected failure in {}", op)));
        }
        Ok(state)
    }
}

fn insert_alloc(
    state: &mut State,
    job_id: &str,
    statuses: Vec<ClientStatus>,
    files: Vec<String>,
) -> String {
    let alloc_id = Uuid::new_v4().to_string();
    state.allocs.insert(
        alloc_id.clone(),
        FakeAlloc {
            job_id: job_id.to_string(),
            statuses: statuses.into(),
            files,
        },
    );
    state
        .job_allocs
        .entry(job_id.to_string())
        .or_default()
        .push(alloc_id.clone());
    alloc_id
}

fn build_allocation(id: &str, job_id: &str, status: ClientStatus) -> Allocation {
    Allocation {
        id: id.to_string(),
        name: format!("{}.test[0]", job_id),
        job_id: job_id.to_string(),
        node_id: "node-0".to_string(),
        task_group: "test".to_string(),
        desired_status: "run".to_string(),
        client_status: status,
        client_description: String::new(),
        task_states: None,
    }
}

#[async_trait]
impl Cluster for FakeCluster {
    async fn leader(&self) -> Result<String> {
        let mut state = self.enter("leader")?;
        if state.leader.len() > 1 {
            return state
                .leader
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()));
        }
        match state.leader.front() {
            Some(Ok(leader)) => Ok(leader.clone()),
            Some(Err(e)) => Err(ClientError::api_error(500, e.to_string())),
            None => Ok("127.0.0.1:4647".to_string()),
        }
    }

    async fn list_nodes(&self) -> Result<Vec<NodeListStub>> {
        let state = self.enter("list_nodes")?;
        Ok(state.nodes.clone())
    }

    async fn parse_job(&self, hcl: &str) -> Result<Job> {
        let _state = self.enter("parse_job")?;
        let job_type = if hcl.contains("\"batch\"") {
            JobType::Batch
        } else {
            JobType::Service
        };
        Ok(Job {
            id: Some("lifecycle".to_string()),
            name: Some("lifecycle".to_string()),
            job_type: Some(job_type),
            namespace: Some("default".to_string()),
            extra: serde_json::Map::new(),
        })
    }

    async fn register_job(&self, job: &Job) -> Result<JobRegisterResponse> {
        let mut state = self.enter("register_job")?;
        let job_id = job.id.clone().unwrap_or_default();
        state.registered.push(job.clone());

        if let Some(placement) = state.placement.clone() {
            for _ in 0..placement.count {
                insert_alloc(
                    &mut state,
                    &job_id,
                    placement.statuses.clone(),
                    placement.files.clone(),
                );
            }
        }

        Ok(JobRegisterResponse {
            eval_id: Uuid::new_v4().to_string(),
            eval_create_index: 1,
            job_modify_index: 1,
            warnings: String::new(),
        })
    }

    async fn job_allocations(&self, job_id: &str) -> Result<Vec<AllocationListStub>> {
        let state = self.enter("job_allocations")?;
        let ids = state.job_allocs.get(job_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| state.allocs.get(id).map(|a| (id, a)))
            .map(|(id, alloc)| AllocationListStub {
                id: id.clone(),
                name: format!("{}.test[0]", job_id),
                job_id: alloc.job_id.clone(),
                node_id: "node-0".to_string(),
                task_group: "test".to_string(),
                desired_status: "run".to_string(),
                client_status: alloc.statuses.front().copied().unwrap_or(ClientStatus::Pending),
            })
            .collect())
    }

    async fn allocation(&self, alloc_id: &str) -> Result<Allocation> {
        let mut state = self.enter("allocation")?;
        let alloc = state
            .allocs
            .get_mut(alloc_id)
            .ok_or_else(|| ClientError::NotFound(format!("alloc not found: {}", alloc_id)))?;
        let status = alloc.next_status();
        Ok(build_allocation(alloc_id, &alloc.job_id, status))
    }

    async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse> {
        let mut state = self.enter("deregister_job")?;
        state.deregistered.push((job_id.to_string(), purge));

        let stopped = state
            .placement
            .as_ref()
            .map(|p| p.stopped)
            .unwrap_or(ClientStatus::Complete);
        let ids = state.job_allocs.get(job_id).cloned().unwrap_or_default();
        for id in ids {
            if let Some(alloc) = state.allocs.get_mut(&id) {
                alloc.statuses = VecDeque::from([stopped]);
            }
        }

        Ok(JobDeregisterResponse {
            eval_id: Uuid::new_v4().to_string(),
            eval_create_index: 2,
            job_modify_index: 2,
        })
    }

    async fn list_alloc_files(&self, alloc_id: &str, path: &str) -> Result<Vec<AllocFileInfo>> {
        let state = self.enter("list_alloc_files")?;
        if path != "alloc" {
            return Err(ClientError::NotFound(format!("no such path: {}", path)));
        }
        let alloc = state
            .allocs
            .get(alloc_id)
            .ok_or_else(|| ClientError::NotFound(format!("alloc not found: {}", alloc_id)))?;
        Ok(alloc.files.iter().map(AllocFileInfo::named).collect())
    }

    async fn garbage_collect(&self) -> Result<()> {
        let _state = self.enter("garbage_collect")?;
        Ok(())
    }
}
