mod access;
mod failover;
mod publish;
mod session;
