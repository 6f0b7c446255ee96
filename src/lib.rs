pub mod configuration;

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod objectwithuuid;

pub mod quadrature {
    pub mod gausskronrod;
    pub mod intervalheap;
    pub mod tolerance;
    pub mod integrationerror;
    pub mod integrationresult;
    pub mod adaptiveintegrator;
    pub mod substitution;
    pub mod substitutionmanager;
}

pub mod workspace {
    pub mod poolerror;
    pub mod gkworkspace;
    pub mod gmworkspace;
    pub mod workspace;
    pub mod poolbackend;
    pub mod workspacepool;
}
