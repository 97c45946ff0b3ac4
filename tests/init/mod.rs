mod init_creates_unborn_repository;
mod reinit_fails;
